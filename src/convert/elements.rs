//! Converters from JaCoCo package/class/method/line nodes to Cobertura nodes

use super::counters::add_counters;
use super::lines::{find_lines, method_lines};
use crate::config::ConvertOptions;
use crate::xml::Element;

/// Source file of a (possibly nested) class: `com/acme/Foo$Inner` -> `com/acme/Foo.java`
pub fn guess_filename(class_name: &str, extension: &str) -> String {
    let outer = class_name.split('$').next().unwrap_or(class_name);
    format!("{}{}", outer, extension)
}

/// Build a `<lines>` block from JaCoCo `<line>` entries
pub fn convert_lines(lines: &[&Element]) -> Element {
    let mut c_lines = Element::new("lines");
    for line in lines {
        c_lines.append_child(convert_line(line));
    }
    c_lines
}

fn convert_line(line: &Element) -> Element {
    let missed_branches = line.number_attribute("mb");
    let covered_branches = line.number_attribute("cb");
    let covered_instructions = line.number_attribute("ci");

    let mut c_line = Element::new("line");
    c_line.set_attribute("number", line.number_attribute("nr").to_string());
    // JaCoCo has no hit counts, only whether any instruction ran
    c_line.set_attribute("hits", if covered_instructions > 0 { "1" } else { "0" });

    // Widened so report-supplied counts cannot overflow
    let total_branches = u128::from(missed_branches) + u128::from(covered_branches);
    if total_branches > 0 {
        let percentage = format!("{}%", 100 * u128::from(covered_branches) / total_branches);
        c_line.set_attribute("branch", "true");
        c_line.set_attribute(
            "condition-coverage",
            format!("{} ({}/{})", percentage, covered_branches, total_branches),
        );

        let mut condition = Element::new("condition");
        condition.set_attribute("number", "0");
        condition.set_attribute("type", "jump");
        condition.set_attribute("coverage", percentage);

        let mut conditions = Element::new("conditions");
        conditions.append_child(condition);
        c_line.append_child(conditions);
    } else {
        c_line.set_attribute("branch", "false");
    }

    c_line
}

pub fn convert_method(method: &Element, lines: &[&Element]) -> Element {
    let mut c_method = Element::new("method");
    c_method.set_attribute("name", method.attribute("name").unwrap_or_default());
    c_method.set_attribute("signature", method.attribute("desc").unwrap_or_default());

    add_counters(method, &mut c_method);
    c_method.append_child(convert_lines(lines));

    c_method
}

/// Convert a class; its lines come from the matching `<sourcefile>` of `package`
pub fn convert_class(class: &Element, package: &Element, options: &ConvertOptions) -> Element {
    let name = class.attribute("name").unwrap_or_default();
    let filename = guess_filename(name, &options.source_extension);

    let mut c_class = Element::new("class");
    c_class.set_attribute("name", name.replace('/', "."));
    c_class.set_attribute("filename", filename.as_str());

    let all_lines = find_lines(package, &filename);
    let all_methods: Vec<&Element> = class.children("method").collect();

    let mut c_methods = Element::new("methods");
    for method in &all_methods {
        let lines = method_lines(method, &all_methods, &all_lines);
        c_methods.append_child(convert_method(method, &lines));
    }
    c_class.append_child(c_methods);

    add_counters(class, &mut c_class);
    c_class.append_child(convert_lines(&all_lines));

    c_class
}

pub fn convert_package(package: &Element, options: &ConvertOptions) -> Element {
    let mut c_package = Element::new("package");
    let name = package.attribute("name").unwrap_or_default();
    c_package.set_attribute("name", name.replace('/', "."));

    let mut c_classes = Element::new("classes");
    for class in package.children("class") {
        c_classes.append_child(convert_class(class, package, options));
    }
    c_package.append_child(c_classes);

    add_counters(package, &mut c_package);

    c_package
}
