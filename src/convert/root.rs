use anyhow::Result;

use super::counters::add_counters;
use super::elements::convert_package;
use crate::config::ConvertOptions;
use crate::xml::Element;

pub const MISSING_SESSIONINFO: &str = "Could not find the 'sessioninfo' XML element.";

/// Convert a whole JaCoCo `<report>` into a Cobertura `<coverage>` element
pub fn convert_root(report: &Element, options: &ConvertOptions) -> Result<Element> {
    let Some(session) = report.descendants("sessioninfo").next() else {
        anyhow::bail!(MISSING_SESSIONINFO);
    };

    let mut coverage = Element::new("coverage");
    // JaCoCo stores milliseconds, Cobertura seconds
    let timestamp = session.number_attribute("start") / 1000;
    coverage.set_attribute("timestamp", timestamp.to_string());

    let mut sources = Element::new("sources");
    for root in &options.source_roots {
        let mut source = Element::new("source");
        source.set_text(root.as_str());
        sources.append_child(source);
    }
    coverage.append_child(sources);

    // Multi-module reports nest packages inside <group> elements
    let mut packages = Element::new("packages");
    for package in report.descendants("package") {
        packages.append_child(convert_package(package, options));
    }
    coverage.append_child(packages);

    add_counters(report, &mut coverage);

    Ok(coverage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sessioninfo() {
        let report = Element::parse(r#"<report name="r"><package name="p"/></report>"#).unwrap();
        let err = convert_root(&report, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), MISSING_SESSIONINFO);
    }

    #[test]
    fn test_timestamp_and_sources() {
        let report = Element::parse(
            r#"<report name="r">
    <sessioninfo id="s" start="1700000000999" dump="1700000005000"/>
    <counter type="LINE" missed="1" covered="1"/>
</report>"#,
        )
        .unwrap();

        let options = ConvertOptions::with_source_roots(vec!["src/main/java".into(), "gen".into()]);
        let coverage = convert_root(&report, &options).unwrap();

        let keys: Vec<_> = coverage.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["timestamp", "line-rate", "branch-rate", "complexity"]);
        assert_eq!(coverage.attribute("timestamp"), Some("1700000000"));
        assert_eq!(coverage.attribute("line-rate"), Some("0.5"));

        let sources: Vec<_> = coverage
            .children("sources")
            .flat_map(|s| s.children("source"))
            .filter_map(|s| s.text())
            .collect();
        assert_eq!(sources, vec!["src/main/java", "gen"]);
    }

    #[test]
    fn test_grouped_packages() {
        let report = Element::parse(
            r#"<report name="r">
    <sessioninfo id="s" start="0" dump="0"/>
    <group name="core"><package name="a/b"/></group>
    <group name="web"><package name="c"/></group>
</report>"#,
        )
        .unwrap();

        let coverage = convert_root(&report, &ConvertOptions::default()).unwrap();
        let packages = coverage.children("packages").next().unwrap();
        let names: Vec<_> = packages.children.iter().filter_map(|p| p.attribute("name")).collect();
        assert_eq!(names, vec!["a.b", "c"]);
    }
}
