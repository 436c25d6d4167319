use crate::report::ReportModel;

/// Render the report model as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(model: &ReportModel) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(model)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_model;

    #[test]
    fn test_render_json() {
        let json = render(&sample_model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["family_id"], "PF10181");
        assert_eq!(value["min_count"], 3);
        assert_eq!(value["date"], "2026-10-18");
        assert_eq!(value["layout"], "by_group");
        assert_eq!(value["groups"][0]["fingerprint"], "GGGGGGA");
        assert_eq!(value["groups"][2]["total_members"], serde_json::Value::Null);
        assert_eq!(value["candidates"][0]["id"], "P6");
        assert_eq!(
            value["candidates"][0]["annotation"]["organism"],
            "Saccharomyces cerevisiae"
        );
        assert_eq!(value["caveats"][0]["kind"], "resolution_incomplete");
    }
}
