//! End-to-end tests for the fixed GHZ circuit and the draw pipeline

use std::fs;

use qdraw::circuit::{ControlledGate, Operation, GHZ_QUBITS};
use qdraw::layout::{compute, LayoutConfig};
use qdraw::renderer::png::pixel_len;
use qdraw::renderer::png_dimensions;
use qdraw::{
    default_circuit, draw, draw_qasm, Circuit, CircuitError, DrawOptions, Drawing, OutputFormat,
    RenderError, Style, StyleError, DEFAULT_SCALE,
};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[test]
fn test_single_gate_targets_qubit_zero() {
    let circuit = default_circuit().unwrap();
    let singles: Vec<usize> = circuit
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Single { qubit, .. } => Some(*qubit),
            _ => None,
        })
        .collect();
    assert_eq!(singles, vec![0]);
}

#[test]
fn test_controlled_gates_form_a_chain() {
    let circuit = default_circuit().unwrap();
    let links: Vec<(usize, usize)> = circuit
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Controlled {
                gate: ControlledGate::CX,
                control,
                target,
            } => Some((*control, *target)),
            _ => None,
        })
        .collect();
    let expected: Vec<(usize, usize)> = (0..7).map(|i| (i, i + 1)).collect();
    assert_eq!(links, expected);
}

#[test]
fn test_single_measurement_is_last() {
    let circuit = default_circuit().unwrap();
    let ops = circuit.operations();
    let measurements: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| op.is_measurement())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(measurements, vec![ops.len() - 1]);

    match ops.last() {
        Some(Operation::MeasureAll { qubits, clbits }) => {
            assert_eq!(qubits, &(0..GHZ_QUBITS).collect::<Vec<_>>());
            assert_eq!(clbits.len(), GHZ_QUBITS);
        }
        other => panic!("Expected measure-all, got {:?}", other),
    }
}

#[test]
fn test_no_qubit_outside_register() {
    let circuit = default_circuit().unwrap();
    for op in circuit.operations() {
        assert!(op.qubits().iter().all(|&q| q < GHZ_QUBITS), "{:?}", op);
    }

    let mut circuit = Circuit::new("ghz", GHZ_QUBITS);
    let err = circuit.cx(7, 8).unwrap_err();
    assert!(matches!(err, CircuitError::QubitOutOfRange { qubit: 8, .. }));
    assert!(circuit.operations().is_empty());
}

#[test]
fn test_draw_writes_exactly_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme_figure_1.png");
    let circuit = default_circuit().unwrap();
    let options = DrawOptions::new()
        .with_filename(&path)
        .with_scale(DEFAULT_SCALE)
        .with_style("iqp-dark");

    let drawing = draw(&circuit, &options).unwrap();
    assert_eq!(drawing.format(), OutputFormat::Png);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read(&path).unwrap(), drawing.as_bytes());
}

#[test]
fn test_second_draw_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme_figure_1.png");
    fs::write(&path, b"stale contents from an earlier run").unwrap();

    let circuit = default_circuit().unwrap();
    let options = DrawOptions::new()
        .with_filename(&path)
        .with_scale(DEFAULT_SCALE)
        .with_style("iqp-dark");

    draw(&circuit, &options).unwrap();
    let first = fs::read(&path).unwrap();
    draw(&circuit, &options).unwrap();
    let second = fs::read(&path).unwrap();

    assert!(first.starts_with(PNG_SIGNATURE));
    assert_eq!(first, second);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_png_dimensions_follow_scale() {
    let circuit = default_circuit().unwrap();
    let layout = compute(&circuit, &LayoutConfig::default()).unwrap();

    let drawing = draw(
        &circuit,
        &DrawOptions::new()
            .with_format(OutputFormat::Png)
            .with_scale(DEFAULT_SCALE),
    )
    .unwrap();
    let bytes = match &drawing {
        Drawing::Png(bytes) => bytes,
        other => panic!("Expected PNG, got {:?}", other.format()),
    };
    assert!(bytes.starts_with(PNG_SIGNATURE));

    let (width, height) = png_dimensions(bytes).unwrap();
    let expected_w = pixel_len(layout.bounds.width, DEFAULT_SCALE);
    let expected_h = pixel_len(layout.bounds.height, DEFAULT_SCALE);
    assert!(width.abs_diff(expected_w) <= 1, "{} vs {}", width, expected_w);
    assert!(height.abs_diff(expected_h) <= 1, "{} vs {}", height, expected_h);
}

#[test]
fn test_svg_drawing_structure() {
    let circuit = default_circuit().unwrap();
    let drawing = draw(
        &circuit,
        &DrawOptions::new()
            .with_format(OutputFormat::Svg)
            .with_style("iqp-dark"),
    )
    .unwrap();
    let svg = drawing.as_text().unwrap();

    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<svg xmlns="));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("#161616"));
    assert_eq!(svg.matches("class=\"qd-column\"").count(), 17);
    assert_eq!(svg.matches("class=\"qd-meter\"").count(), 8);
}

#[test]
fn test_svg_extension_selects_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ghz.svg");
    let drawing = draw(
        &default_circuit().unwrap(),
        &DrawOptions::new().with_filename(&path),
    )
    .unwrap();
    assert_eq!(drawing.format(), OutputFormat::Svg);
    assert!(fs::read_to_string(&path).unwrap().contains("<svg xmlns="));
}

#[test]
fn test_text_drawing() {
    let drawing = draw(&default_circuit().unwrap(), &DrawOptions::new()).unwrap();
    let text = drawing.as_text().unwrap();
    let rows: Vec<&str> = text.lines().collect();

    // three rows per qubit and the classical register
    assert_eq!(rows.len(), (GHZ_QUBITS + 1) * 3);
    assert!(rows[1].starts_with("   q_0: "));
    assert!(text.contains("meas: 8/"));
    assert_eq!(text.matches("┤M├").count(), 8);
}

#[test]
fn test_custom_style_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mine.toml");
    fs::write(
        &path,
        r##"
[metadata]
name = "mine"
base = "iqp-dark"

[colors]
background = "#123456"
"##,
    )
    .unwrap();

    let style = Style::from_file(&path).unwrap();
    let drawing = draw(
        &default_circuit().unwrap(),
        &DrawOptions::new()
            .with_format(OutputFormat::Svg)
            .with_custom_style(style),
    )
    .unwrap();
    let svg = drawing.as_text().unwrap();
    assert!(svg.contains("#123456"));
    assert!(!svg.contains("#161616"));
}

#[test]
fn test_unknown_style_lists_alternatives() {
    let err = draw(
        &default_circuit().unwrap(),
        &DrawOptions::new().with_style("solarized"),
    )
    .unwrap_err();
    match err {
        RenderError::Style(StyleError::UnknownStyle { name, available }) => {
            assert_eq!(name, "solarized");
            assert!(available.iter().any(|s| s == "iqp-dark"));
        }
        other => panic!("Expected unknown style, got {:?}", other),
    }
}

#[test]
fn test_invalid_scale_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    let err = draw(
        &default_circuit().unwrap(),
        &DrawOptions::new().with_filename(&path).with_scale(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::InvalidScale(_)));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.svg");
    let err = draw(
        &default_circuit().unwrap(),
        &DrawOptions::new().with_filename(&path),
    )
    .unwrap_err();
    match err {
        RenderError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("Expected IO error, got {:?}", other),
    }
}

#[test]
fn test_draw_qasm_source() {
    let drawing = draw_qasm(
        "OPENQASM 2.0; qreg q[2]; creg c[2]; h q[0]; cx q[0], q[1]; measure q -> c;",
        "bell",
        &DrawOptions::new().with_format(OutputFormat::Text),
    )
    .unwrap();
    let text = drawing.as_text().unwrap();
    assert!(text.contains("┤ H ├"));
    assert!(text.contains("c: 2/"));
}

#[test]
fn test_huge_register_is_an_error() {
    let err = draw_qasm(
        "qreg q[100000000000000]; h q[0];",
        "huge",
        &DrawOptions::new().with_format(OutputFormat::Text),
    )
    .unwrap_err();
    match err {
        RenderError::Parse(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].to_string().contains("at most 4096"));
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}
