//! Links to the external ChEMBL compound report. The report itself is an
//! opaque web page; this module only builds its URL.

/// Compound shown before the first click.
pub const DEFAULT_COMPOUND: &str = "CHEMBL34259";

pub fn compound_report_url(cmpd_id: &str) -> String {
    format!("https://www.ebi.ac.uk/chembl/beta/embed/#mini_report_card/Compound/{cmpd_id}")
}

/// Maps a click result to the report URL. A click that did not resolve to a
/// compound id keeps the viewer unchanged, so `None` stays `None`.
pub fn url_from_click(clicked_id: Option<&str>) -> Option<String> {
    clicked_id
        .filter(|id| !id.is_empty())
        .map(compound_report_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_substitution() {
        assert_eq!(
            compound_report_url("CHEMBL119"),
            "https://www.ebi.ac.uk/chembl/beta/embed/#mini_report_card/Compound/CHEMBL119"
        );
    }

    #[test]
    fn test_malformed_click_is_ignored() {
        assert_eq!(url_from_click(None), None);
        assert_eq!(url_from_click(Some("")), None);
        assert!(url_from_click(Some("CHEMBL1")).is_some());
    }
}
