use float_eq::assert_float_eq;

use super::error::LayoutError;
use super::*;
use crate::diagnostics::Severity;
use crate::error::ErrorSource;
use crate::family::error::ClassifyError;
use crate::port::Direction;

const PARAMS: GeometryParams = GeometryParams {
    scale: 50.0,
    grid_pitch: 0.66,
};

const AND2: &str = r#"magic
tech scmos
timestamp 1700000000
<< nwell >>
rect 0 250 66 500
<< metal1 >>
rect 0 0 66 40
rect 0 460 132 500
<< labels >>
rlabel metal1 0 0 0 0 1 GND!
rlabel metal1 0 500 0 500 5 Vdd!
rlabel metal2 33 100 33 100 1 A
rlabel metal2 66 100 66 100 1 B
rlabel metal2 99 100 99 100 1 Y
rlabel metal2 99 300 99 300 1 Y
rlabel metal1 33 0 33 0 1 Scan
rlabel metal1 33 500 33 500 5 ScanReturn
rlabel metal1 66 0 66 0 1 Test
rlabel metal1 66 500 66 500 5 Test
rlabel metal1 99 0 99 0 1 Clock
rlabel metal1 0 250 0 250 3 nReset
<< end >>
"#;

#[test]
fn parses_records() {
    let layout = Layout::parse(AND2).unwrap();
    let rects = layout
        .records()
        .iter()
        .filter(|r| matches!(r, Record::Rect { .. }))
        .count();
    assert_eq!(rects, 3);
    assert_eq!(layout.labels().count(), 12);
    assert_eq!(
        layout.labels().next(),
        Some(("GND!", Coordinate::new(0.0, 0.0)))
    );
}

#[test]
fn dimensions_use_the_largest_upper_corner() {
    let layout = Layout::parse(AND2).unwrap();
    let dims = layout.dimensions(PARAMS.scale).unwrap();
    assert_float_eq!(dims.width, 2.64, abs <= 1e-12);
    assert_float_eq!(dims.height, 10.0, abs <= 1e-12);
    assert_float_eq!(dims.area(), 26.4, abs <= 1e-12);
}

#[test]
fn malformed_records_are_rejected() {
    let err = Layout::parse("rect 0 0 ten 20\n").unwrap_err();
    assert_eq!(
        err,
        LayoutError::MalformedRecord {
            kind: "rect",
            line: 1,
            record: "rect 0 0 ten 20".to_string(),
        }
    );
    assert!(Layout::parse("rlabel metal1 0 0 A\n").is_err());
}

#[test]
fn two_input_gate_ports() {
    let layout = Layout::parse(AND2).unwrap();
    let mut diags = Diagnostics::in_memory();
    let geometry = extract_geometry("and2", Family::And, &layout, PARAMS, &mut diags).unwrap();

    let inputs: Vec<_> = geometry
        .ports
        .iter()
        .filter(|p| p.direction() == Direction::Input)
        .map(|p| p.name().as_str())
        .collect();
    let outputs: Vec<_> = geometry
        .ports
        .iter()
        .filter(|p| p.direction() == Direction::Output)
        .map(|p| p.name().as_str())
        .collect();
    assert_eq!(inputs, vec!["A", "B"]);
    assert_eq!(outputs, vec!["Y"]);
    assert_eq!(geometry.ports.len(), 10);
    assert_eq!(diags.warning_count(), 0);
}

#[test]
fn repeated_labels_merge_in_encounter_order() {
    let layout = Layout::parse(AND2).unwrap();
    let mut diags = Diagnostics::in_memory();
    let geometry = extract_geometry("and2", Family::And, &layout, PARAMS, &mut diags).unwrap();

    let y: Vec<_> = geometry
        .ports
        .iter()
        .filter(|p| p.name().as_str() == "Y")
        .collect();
    assert_eq!(y.len(), 1);
    assert_eq!(
        y[0].positions(),
        &[Coordinate::new(1.98, 2.0), Coordinate::new(1.98, 6.0)]
    );

    let test = geometry
        .ports
        .iter()
        .find(|p| p.name().as_str() == "Test")
        .unwrap();
    assert_eq!(
        test.positions(),
        &[Coordinate::new(1.32, 0.0), Coordinate::new(1.32, 10.0)]
    );
}

#[test]
fn ports_sort_by_direction_then_name() {
    let layout = Layout::parse(AND2).unwrap();
    let mut diags = Diagnostics::in_memory();
    let geometry = extract_geometry("and2", Family::And, &layout, PARAMS, &mut diags).unwrap();
    let names: Vec<_> = geometry.ports.iter().map(|p| p.name().as_str()).collect();
    assert_eq!(
        names,
        vec!["A", "B", "Y", "GND!", "Vdd!", "Clock", "Scan", "ScanReturn", "Test", "nReset"]
    );
}

#[test]
fn unknown_port_aborts_extraction() {
    let text = format!("{AND2}rlabel metal2 99 200 99 200 1 Z\n");
    let layout = Layout::parse(&text).unwrap();
    let mut diags = Diagnostics::in_memory();
    let err = extract_geometry("and2", Family::And, &layout, PARAMS, &mut diags).unwrap_err();
    assert!(matches!(
        err.source(),
        ErrorSource::Classify(ClassifyError::UnknownPort { port, .. }) if port == "Z"
    ));
}

#[test]
fn layout_without_geometry_is_rejected() {
    let layout = Layout::parse("rlabel metal1 0 0 0 0 1 A\n").unwrap();
    let mut diags = Diagnostics::in_memory();
    let err = extract_geometry("inv", Family::Inv, &layout, PARAMS, &mut diags).unwrap_err();
    assert!(matches!(
        err.source(),
        ErrorSource::Layout(LayoutError::NoGeometry(_))
    ));
}

#[test]
fn edge_ports_on_grid_never_warn() {
    let dims = Dimensions {
        width: 6.6,
        height: 10.0,
    };
    let mut diags = Diagnostics::in_memory();
    for k in 0..=10 {
        let x = k as f64 * 0.66;
        check_position("inv", "A", Coordinate::new(x, 0.0), dims, 0.66, &mut diags);
        check_position("inv", "A", Coordinate::new(x, 10.0), dims, 0.66, &mut diags);
    }
    assert_eq!(diags.warning_count(), 0);
}

#[test]
fn edge_ports_off_grid_always_warn() {
    let dims = Dimensions {
        width: 6.6,
        height: 10.0,
    };
    let mut diags = Diagnostics::in_memory();
    for k in 0..=9 {
        let x = k as f64 * 0.66 + 0.1;
        check_position("inv", "A", Coordinate::new(x, 0.0), dims, 0.66, &mut diags);
        check_position("inv", "A", Coordinate::new(x, 10.0), dims, 0.66, &mut diags);
    }
    assert_eq!(diags.warning_count(), 20);
    let first = diags.with_severity(Severity::Warning).next().unwrap();
    assert_eq!(
        first.message,
        "Vertical port A at (0.1, 0) in cell inv is not aligned to 0.66 µm grid"
    );
}

#[test]
fn interior_ports_are_not_checked() {
    let dims = Dimensions {
        width: 6.6,
        height: 10.0,
    };
    let mut diags = Diagnostics::in_memory();
    check_position("inv", "A", Coordinate::new(0.1, 5.0), dims, 0.66, &mut diags);
    assert_eq!(diags.warning_count(), 0);
}

#[test]
fn width_off_grid_warns_except_for_boundary_cells() {
    let dims = Dimensions {
        width: 2.0,
        height: 10.0,
    };
    let mut diags = Diagnostics::in_memory();
    check_width("inv", Family::Inv, dims, 0.66, &mut diags);
    assert_eq!(diags.warning_count(), 1);
    check_width("rightend", Family::RightEnd, dims, 0.66, &mut diags);
    assert_eq!(diags.warning_count(), 1);
}
