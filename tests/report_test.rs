use microtone::{report::PrettyReporter, run};

fn render(source: &str) -> String {
    let error = run(source).unwrap_err();
    PrettyReporter::new(source, "sample.mt").format(&error)
}

#[test]
fn test_lexical_error_location() {
    let output = render("x = 1 rest\nprint 2 @ rest");
    assert!(output.contains("sample.mt:2:9"), "{output}");
    assert!(output.contains("LexError"), "{output}");
}

#[test]
fn test_location_after_multibyte_text() {
    let output = render("print \"héllo wörld\" @ rest");
    assert!(output.contains("sample.mt:1:21"), "{output}");
}

#[test]
fn test_runtime_error_points_at_line() {
    let output = render("x = \"é\" rest\nprint missing rest");
    assert!(output.contains("sample.mt:2:1"), "{output}");
    assert!(output.contains("NameError"), "{output}");
}
