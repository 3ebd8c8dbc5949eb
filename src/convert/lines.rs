//! Line lookup and method line-range inference
//!
//! JaCoCo only records the first line of each method. A method is assumed to
//! span from its own first line up to (excluding) the next larger first line
//! declared in the same class; the last method runs to the end of the file.

use std::ops::Range;

use crate::xml::Element;

/// `<line>` entries of the package's `<sourcefile>` matching `filename`.
///
/// Directories are stripped from `filename` before matching. No match yields
/// an empty list.
pub fn find_lines<'a>(package: &'a Element, filename: &str) -> Vec<&'a Element> {
    let basename = filename.rsplit('/').next().unwrap_or(filename);

    package
        .children("sourcefile")
        .find(|sourcefile| sourcefile.attribute("name") == Some(basename))
        .map(|sourcefile| sourcefile.children("line").collect())
        .unwrap_or_default()
}

/// First line of a method, `0` when the report does not record one
pub fn start_line(method: &Element) -> u64 {
    method.number_attribute("line")
}

/// Half-open range of line numbers owned by `method`
pub fn method_range(method: &Element, all_methods: &[&Element]) -> Range<u64> {
    let start = start_line(method);
    let end = all_methods
        .iter()
        .copied()
        .map(start_line)
        .filter(|&line| line > start)
        .min()
        .unwrap_or(u64::MAX);

    start..end
}

/// Lines of `all_lines` that fall into the range of `method`, in their original order.
///
/// Methods sharing a first line get the same lines.
pub fn method_lines<'a>(
    method: &Element,
    all_methods: &[&Element],
    all_lines: &[&'a Element],
) -> Vec<&'a Element> {
    let range = method_range(method, all_methods);

    all_lines
        .iter()
        .copied()
        .filter(|line| range.contains(&line.number_attribute("nr")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = r#"<package name="p">
    <class name="p/C">
        <method name="&lt;init&gt;" desc="()V" line="3"/>
        <method name="first" desc="()V" line="10"/>
        <method name="second" desc="()V" line="20"/>
    </class>
    <sourcefile name="Other.java">
        <line nr="1" mi="0" ci="1" mb="0" cb="0"/>
    </sourcefile>
    <sourcefile name="C.java">
        <line nr="3" mi="0" ci="3" mb="0" cb="0"/>
        <line nr="10" mi="0" ci="2" mb="0" cb="0"/>
        <line nr="15" mi="1" ci="0" mb="1" cb="1"/>
        <line nr="20" mi="0" ci="4" mb="0" cb="0"/>
        <line nr="25" mi="0" ci="1" mb="0" cb="0"/>
        <line nr="100" mi="0" ci="1" mb="0" cb="0"/>
    </sourcefile>
</package>"#;

    fn numbers(lines: &[&Element]) -> Vec<u64> {
        lines.iter().map(|l| l.number_attribute("nr")).collect()
    }

    #[test]
    fn test_find_lines_strips_directories() {
        let package = Element::parse(PACKAGE).unwrap();

        let lines = find_lines(&package, "p/C.java");
        assert_eq!(numbers(&lines), vec![3, 10, 15, 20, 25, 100]);

        let lines = find_lines(&package, "C.java");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_find_lines_no_match() {
        let package = Element::parse(PACKAGE).unwrap();
        assert!(find_lines(&package, "p/Missing.java").is_empty());
        assert!(find_lines(&package, "p/c.java").is_empty());
    }

    #[test]
    fn test_method_lines() {
        let package = Element::parse(PACKAGE).unwrap();
        let class = package.children("class").next().unwrap();
        let methods: Vec<_> = class.children("method").collect();
        let lines = find_lines(&package, "p/C.java");

        assert_eq!(numbers(&method_lines(methods[0], &methods, &lines)), vec![3]);
        assert_eq!(numbers(&method_lines(methods[1], &methods, &lines)), vec![10, 15]);
        assert_eq!(numbers(&method_lines(methods[2], &methods, &lines)), vec![20, 25, 100]);
    }

    #[test]
    fn test_ranges_partition_lines() {
        let package = Element::parse(PACKAGE).unwrap();
        let class = package.children("class").next().unwrap();
        // Declaration order must not matter
        let mut methods: Vec<_> = class.children("method").collect();
        methods.reverse();
        let lines = find_lines(&package, "p/C.java");

        let mut owned: Vec<u64> = methods
            .iter()
            .flat_map(|m| numbers(&method_lines(m, &methods, &lines)))
            .collect();
        owned.sort_unstable();
        assert_eq!(owned, numbers(&lines));
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let class = Element::parse(
            r#"<class><method name="a" line="9"/><method name="b" line="100"/></class>"#,
        )
        .unwrap();
        let methods: Vec<_> = class.children("method").collect();

        assert_eq!(method_range(methods[0], &methods), 9..100);
        assert_eq!(method_range(methods[1], &methods), 100..u64::MAX);
    }

    #[test]
    fn test_missing_line_starts_at_zero() {
        let class = Element::parse(
            r#"<class><method name="synthetic"/><method name="b" line="5"/></class>"#,
        )
        .unwrap();
        let methods: Vec<_> = class.children("method").collect();

        assert_eq!(start_line(methods[0]), 0);
        assert_eq!(method_range(methods[0], &methods), 0..5);
    }

    #[test]
    fn test_shared_start_line() {
        let package = Element::parse(
            r#"<package>
    <class>
        <method name="a" line="10"/>
        <method name="lambda$a$0" line="10"/>
        <method name="b" line="20"/>
    </class>
    <sourcefile name="C.java">
        <line nr="10" ci="1" mb="0" cb="0"/>
        <line nr="11" ci="1" mb="0" cb="0"/>
        <line nr="20" ci="1" mb="0" cb="0"/>
    </sourcefile>
</package>"#,
        )
        .unwrap();
        let class = package.children("class").next().unwrap();
        let methods: Vec<_> = class.children("method").collect();
        let lines = find_lines(&package, "C.java");

        assert_eq!(numbers(&method_lines(methods[0], &methods, &lines)), vec![10, 11]);
        assert_eq!(numbers(&method_lines(methods[1], &methods, &lines)), vec![10, 11]);
        assert_eq!(numbers(&method_lines(methods[2], &methods, &lines)), vec![20]);
    }
}
