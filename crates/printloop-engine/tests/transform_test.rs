//! End-to-end transformation tests driving the public `transform` entry
//! point against files on disk.

use std::fs;
use std::path::PathBuf;

use printloop_core::{CatalogError, Error, ProcessingRequest, SearchError};
use printloop_engine::transform;
use tempfile::TempDir;

fn write_input(dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = dir.path().join("input.gcode");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("write input");
    path
}

fn output_path(dir: &TempDir) -> PathBuf {
    dir.path().join("output.gcode")
}

fn read_lines(path: &PathBuf) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Build a custom definition document. `template` is embedded as an
/// escaped single-line TOML string so tests control the exact source.
fn definition(
    init_markers: &[&str],
    print_markers: &[&str],
    strategies: (&str, &str),
    template: &str,
    extra: &str,
) -> String {
    let quote = |items: &[&str]| {
        items
            .iter()
            .map(|m| format!("\"{m}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let code = template
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");

    format!(
        "[Markers]\n\
         EndInitSection = [{init}]\n\
         EndPrintSection = [{print}]\n\
         \n\
         [SearchStrategy]\n\
         EndInitSectionStrategy = \"{init_strategy}\"\n\
         EndPrintSectionStrategy = \"{print_strategy}\"\n\
         \n\
         [Template]\n\
         Code = \"{code}\"\n\
         \n\
         {extra}\n",
        init = quote(init_markers),
        print = quote(print_markers),
        init_strategy = strategies.0,
        print_strategy = strategies.1,
    )
}

fn request(iterations: i64, printer: &str, custom_template: Option<String>) -> ProcessingRequest {
    ProcessingRequest {
        file_name: "input.gcode".to_string(),
        iterations,
        wait_bed_cooldown_temp: 28,
        wait_min: 0,
        extra_extrude: 0.0,
        printer: printer.to_string(),
        custom_template,
    }
}

// A template whose rendered output is a single newline: after the
// split-and-suppress emission rules it contributes no lines at all.
const EMPTY_TEMPLATE: &str = "\n";

#[test]
fn test_round_trip_two_iterations() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["HEADER", "START_PRINT", "BODY", "END_PRINT", "FOOTER"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    transform(&input, &output, &request(2, "unit-tests", Some(def))).unwrap();

    assert_eq!(
        read_lines(&output),
        vec![
            "HEADER",
            "START_PRINT",
            "BODY",
            "END_PRINT",
            "BODY",
            "END_PRINT",
            "FOOTER",
        ]
    );
}

#[test]
fn test_multiline_init_marker_with_interleaved_comments() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &["HEADER", "M1", "; comment", "", "M2", "BODY", "END", "FOOTER"],
    );
    let output = output_path(&dir);

    let def = definition(
        &["M1", "M2"],
        &["END"],
        ("after_first_appear", "after_first_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    transform(&input, &output, &request(2, "unit-tests", Some(def))).unwrap();

    // Init range is (1, 4); the whole window, comments included, is part
    // of the header and is emitted exactly once.
    assert_eq!(
        read_lines(&output),
        vec![
            "HEADER", "M1", "; comment", "", "M2", "BODY", "END", "BODY", "END", "FOOTER",
        ]
    );
}

#[test]
fn test_single_iteration_with_empty_template_is_identity() {
    let dir = TempDir::new().unwrap();
    let lines = [
        "HEADER",
        "START_PRINT",
        "G1 X10 Y20 E0.5",
        "G1 X30 Y40 E0.5",
        "END_PRINT",
        "FOOTER1",
        "FOOTER2",
    ];
    let input = write_input(&dir, &lines);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    transform(&input, &output, &request(1, "custom", Some(def))).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        fs::read_to_string(&input).unwrap()
    );
}

#[test]
fn test_output_line_count_arithmetic() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &[
            "HEADER1",
            "HEADER2",
            "START_PRINT",
            "G1 X10 Y20 E0.5",
            "BODY2",
            "BODY3",
            "END_PRINT",
            "FOOTER1",
            "FOOTER2",
        ],
    );
    let output = output_path(&dir);

    let iterations = 5u64;
    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        "; loop {{ Iteration }}\n; loop end {{ Iteration }}\n",
        "",
    );
    transform(
        &input,
        &output,
        &request(iterations as i64, "custom", Some(def)),
    )
    .unwrap();

    // header = 3, body = 3, marker = 1, template = 2, footer = 2
    let expected = 3 + iterations * (3 + 1 + 2) + 2;
    assert_eq!(read_lines(&output).len() as u64, expected);
}

#[test]
fn test_rendered_template_between_copies() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &[
            "START_PRINT",
            "G1 Z3.0",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "FOOTER",
        ],
    );
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        "; cycle {{ Iteration }} of {{ Request.Iterations }}\nG1 Z{{ add(Positions.LastPrintZ, 2.0) }} F{{ Config.TravelFeedrate }}\n",
        "[Parameters]\nTravelFeedrate = 12000\n",
    );
    transform(&input, &output, &request(2, "custom", Some(def))).unwrap();

    assert_eq!(
        read_lines(&output),
        vec![
            "START_PRINT",
            "G1 Z3.0",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "; cycle 1 of 2",
            "G1 Z5.0 F12000.0",
            "G1 Z3.0",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "; cycle 2 of 2",
            "G1 Z5.0 F12000.0",
            "FOOTER",
        ]
    );
}

#[test]
fn test_marker_comment_split_in_header() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &[
            "HEADER",
            "M211 X0 Y0 Z0 ;turn off soft endstop",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "FOOTER",
        ],
    );
    let output = output_path(&dir);

    let def = definition(
        &["M211 X0 Y0 Z0"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    transform(&input, &output, &request(1, "custom", Some(def))).unwrap();

    assert_eq!(
        read_lines(&output),
        vec![
            "HEADER",
            "M211 X0 Y0 Z0",
            ";turn off soft endstop",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "FOOTER",
        ]
    );
}

#[test]
fn test_assertion_rejection_produces_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &[
            "START_PRINT",
            "G1 Z10.0",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
        ],
    );
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "[Assertions]\nLastPrintZ = [0.0, 5.0]\n",
    );
    let err = transform(&input, &output, &request(2, "custom", Some(def))).unwrap_err();

    match &err {
        Error::AssertionFailed { field, value, .. } => {
            assert_eq!(field, "LastPrintZ");
            assert_eq!(*value, 10.0);
        }
        other => panic!("expected AssertionFailed, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Assertion failed: LastPrintZ value 10.00 is outside allowed range [0.00, 5.00]"
    );
    assert!(!output.exists());
}

#[test]
fn test_assertion_on_unknown_field() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["START_PRINT", "G1 X1 Y1 E1", "END_PRINT"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "[Assertions]\nEndInitSectionFirstLine = [0.0, 5.0]\n",
    );
    let err = transform(&input, &output, &request(1, "custom", Some(def))).unwrap_err();
    assert!(matches!(err, Error::MalformedAssertion { .. }));
}

#[test]
fn test_assertion_with_wrong_arity() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["START_PRINT", "G1 X1 Y1 E1", "END_PRINT"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "[Assertions]\nLastPrintZ = [0.0, 5.0, 9.0]\n",
    );
    let err = transform(&input, &output, &request(1, "custom", Some(def))).unwrap_err();
    assert!(matches!(err, Error::MalformedAssertion { .. }));
}

#[test]
fn test_invalid_iterations() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["START_PRINT", "BODY", "END_PRINT"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    let err = transform(&input, &output, &request(0, "unit-tests", Some(def))).unwrap_err();
    assert!(matches!(err, Error::InvalidIterations { value: 0 }));
}

#[test]
fn test_marker_conflict_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["whatever"]);
    let output = output_path(&dir);

    let def = definition(
        &["END_PRINT now"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    let err = transform(&input, &output, &request(1, "unit-tests", Some(def))).unwrap_err();
    assert!(matches!(
        err,
        Error::Search(SearchError::MarkerConflict { .. })
    ));
}

#[test]
fn test_unknown_strategy() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["whatever"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_second_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    let err = transform(&input, &output, &request(1, "unit-tests", Some(def))).unwrap_err();
    assert!(matches!(
        err,
        Error::Search(SearchError::UnknownStrategy { .. })
    ));
}

#[test]
fn test_missing_markers_in_custom_definition() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["whatever"]);
    let output = output_path(&dir);

    let def = "[Template]\nCode = \"x\"\n".to_string();
    let err = transform(&input, &output, &request(1, "unit-tests", Some(def))).unwrap_err();
    assert!(matches!(
        err,
        Error::Catalog(CatalogError::MalformedDefinition { .. })
    ));
}

#[test]
fn test_no_print_commands_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["START_PRINT", "G0 X1 Y1", "END_PRINT"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    let err = transform(&input, &output, &request(1, "my-printer", Some(def.clone()))).unwrap_err();
    assert!(matches!(err, Error::NoPrintCommandsFound { after_line: 0 }));

    // The check is waived for test fixtures.
    transform(&input, &output, &request(1, "unit-tests", Some(def))).unwrap();
}

#[test]
fn test_marker_not_found() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &["no markers here", "G1 X1 Y1 E1"]);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    let err = transform(&input, &output, &request(1, "unit-tests", Some(def))).unwrap_err();
    assert!(matches!(
        err,
        Error::Search(SearchError::InitMarkerNotFound { .. })
    ));
}

#[test]
fn test_catalog_backed_transformation() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        &[
            "HEADER",
            "START_PRINT",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "FOOTER",
        ],
    );
    let output = output_path(&dir);

    // The embedded "unit-tests" definition drives this end to end.
    transform(&input, &output, &request(2, "unit-tests", None)).unwrap();

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![
            "HEADER",
            "START_PRINT",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "; test loop 1",
            "; test loop end 1",
            "G1 X10 Y20 E0.5",
            "END_PRINT",
            "; test loop 2",
            "; test loop end 2",
            "FOOTER",
        ]
    );
}

#[test]
fn test_footer_order_preserved() {
    let dir = TempDir::new().unwrap();
    let footer = ["F1", "F2", "F3", "F4"];
    let mut lines = vec!["START_PRINT", "G1 X1 Y1 E1", "END_PRINT"];
    lines.extend(footer);
    let input = write_input(&dir, &lines);
    let output = output_path(&dir);

    let def = definition(
        &["START_PRINT"],
        &["END_PRINT"],
        ("after_first_appear", "after_last_appear"),
        EMPTY_TEMPLATE,
        "",
    );
    transform(&input, &output, &request(3, "custom", Some(def))).unwrap();

    let out = read_lines(&output);
    let tail: Vec<&str> = out.iter().rev().take(4).rev().map(String::as_str).collect();
    assert_eq!(tail, footer);
}
