//! Gate kinds and their display labels

use std::f64::consts::PI;

/// Colour class a gate is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateFamily {
    Hadamard,
    Pauli,
    Clifford,
    Phase,
    Rotation,
    Multi,
    Swap,
    Measure,
}

impl GateFamily {
    /// Key used for this family in style files
    pub fn as_str(&self) -> &'static str {
        match self {
            GateFamily::Hadamard => "hadamard",
            GateFamily::Pauli => "pauli",
            GateFamily::Clifford => "clifford",
            GateFamily::Phase => "phase",
            GateFamily::Rotation => "rotation",
            GateFamily::Multi => "multi",
            GateFamily::Swap => "swap",
            GateFamily::Measure => "measure",
        }
    }

    pub fn all() -> &'static [GateFamily] {
        &[
            GateFamily::Hadamard,
            GateFamily::Pauli,
            GateFamily::Clifford,
            GateFamily::Phase,
            GateFamily::Rotation,
            GateFamily::Multi,
            GateFamily::Swap,
            GateFamily::Measure,
        ]
    }
}

/// Gates acting on a single qubit
#[derive(Debug, Clone, PartialEq)]
pub enum SingleGate {
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    P(f64),
}

impl SingleGate {
    /// Lowercase OpenQASM name
    pub fn name(&self) -> &'static str {
        match self {
            SingleGate::H => "h",
            SingleGate::X => "x",
            SingleGate::Y => "y",
            SingleGate::Z => "z",
            SingleGate::S => "s",
            SingleGate::Sdg => "sdg",
            SingleGate::T => "t",
            SingleGate::Tdg => "tdg",
            SingleGate::SX => "sx",
            SingleGate::Rx(_) => "rx",
            SingleGate::Ry(_) => "ry",
            SingleGate::Rz(_) => "rz",
            SingleGate::P(_) => "p",
        }
    }

    /// Look up a gate by name, consuming a parameter for rotations
    pub fn from_name(name: &str, param: Option<f64>) -> Option<Self> {
        let gate = match (name, param) {
            ("h", None) => SingleGate::H,
            ("x", None) => SingleGate::X,
            ("y", None) => SingleGate::Y,
            ("z", None) => SingleGate::Z,
            ("s", None) => SingleGate::S,
            ("sdg", None) => SingleGate::Sdg,
            ("t", None) => SingleGate::T,
            ("tdg", None) => SingleGate::Tdg,
            ("sx", None) => SingleGate::SX,
            ("rx", Some(theta)) => SingleGate::Rx(theta),
            ("ry", Some(theta)) => SingleGate::Ry(theta),
            ("rz", Some(theta)) => SingleGate::Rz(theta),
            ("p" | "u1", Some(theta)) => SingleGate::P(theta),
            _ => return None,
        };
        Some(gate)
    }

    /// Text drawn inside the gate box
    pub fn label(&self) -> String {
        match self {
            SingleGate::H => "H".to_string(),
            SingleGate::X => "X".to_string(),
            SingleGate::Y => "Y".to_string(),
            SingleGate::Z => "Z".to_string(),
            SingleGate::S => "S".to_string(),
            SingleGate::Sdg => "S†".to_string(),
            SingleGate::T => "T".to_string(),
            SingleGate::Tdg => "T†".to_string(),
            SingleGate::SX => "√X".to_string(),
            SingleGate::Rx(theta) => format!("Rx({})", format_angle(*theta)),
            SingleGate::Ry(theta) => format!("Ry({})", format_angle(*theta)),
            SingleGate::Rz(theta) => format!("Rz({})", format_angle(*theta)),
            SingleGate::P(theta) => format!("P({})", format_angle(*theta)),
        }
    }

    pub fn family(&self) -> GateFamily {
        match self {
            SingleGate::H => GateFamily::Hadamard,
            SingleGate::X | SingleGate::Y | SingleGate::Z => GateFamily::Pauli,
            SingleGate::S | SingleGate::Sdg | SingleGate::SX => GateFamily::Clifford,
            SingleGate::T | SingleGate::Tdg | SingleGate::P(_) | SingleGate::Rz(_) => {
                GateFamily::Phase
            }
            SingleGate::Rx(_) | SingleGate::Ry(_) => GateFamily::Rotation,
        }
    }

    pub fn param(&self) -> Option<f64> {
        match self {
            SingleGate::Rx(t) | SingleGate::Ry(t) | SingleGate::Rz(t) | SingleGate::P(t) => {
                Some(*t)
            }
            _ => None,
        }
    }
}

/// Two-qubit gates with one control and one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlledGate {
    CX,
    CY,
    CZ,
}

impl ControlledGate {
    pub fn name(&self) -> &'static str {
        match self {
            ControlledGate::CX => "cx",
            ControlledGate::CY => "cy",
            ControlledGate::CZ => "cz",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cx" | "cnot" => Some(ControlledGate::CX),
            "cy" => Some(ControlledGate::CY),
            "cz" => Some(ControlledGate::CZ),
            _ => None,
        }
    }

    /// Label of the target box; CX and CZ have dedicated glyphs instead
    pub fn target_label(&self) -> &'static str {
        match self {
            ControlledGate::CX => "X",
            ControlledGate::CY => "Y",
            ControlledGate::CZ => "Z",
        }
    }

    pub fn family(&self) -> GateFamily {
        match self {
            ControlledGate::CX => GateFamily::Multi,
            ControlledGate::CY | ControlledGate::CZ => GateFamily::Pauli,
        }
    }
}

/// Format an angle as a multiple of π when it is one, otherwise as a short decimal
pub fn format_angle(theta: f64) -> String {
    const EPS: f64 = 1e-9;

    if theta.abs() < EPS {
        return "0".to_string();
    }

    for den in 1..=8u32 {
        let num = theta * den as f64 / PI;
        let rounded = num.round();
        if rounded != 0.0 && (num - rounded).abs() < EPS && rounded.abs() <= 16.0 {
            let sign = if rounded < 0.0 { "-" } else { "" };
            let n = rounded.abs() as u32;
            let numerator = if n == 1 {
                "π".to_string()
            } else {
                format!("{}π", n)
            };
            return if den == 1 {
                format!("{}{}", sign, numerator)
            } else {
                format!("{}{}/{}", sign, numerator, den)
            };
        }
    }

    let s = format!("{:.3}", theta);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_angle_multiples_of_pi() {
        assert_eq!(format_angle(PI), "π");
        assert_eq!(format_angle(PI / 2.0), "π/2");
        assert_eq!(format_angle(3.0 * PI / 4.0), "3π/4");
        assert_eq!(format_angle(-PI / 4.0), "-π/4");
        assert_eq!(format_angle(2.0 * PI), "2π");
    }

    #[test]
    fn test_format_angle_decimal() {
        assert_eq!(format_angle(0.0), "0");
        assert_eq!(format_angle(0.5), "0.5");
        assert_eq!(format_angle(1.25), "1.25");
        assert_eq!(format_angle(0.1234), "0.123");
    }

    #[test]
    fn test_single_gate_lookup() {
        assert_eq!(SingleGate::from_name("h", None), Some(SingleGate::H));
        assert_eq!(SingleGate::from_name("rx", Some(1.0)), Some(SingleGate::Rx(1.0)));
        // rotations need a parameter, fixed gates reject one
        assert_eq!(SingleGate::from_name("rx", None), None);
        assert_eq!(SingleGate::from_name("h", Some(1.0)), None);
        assert_eq!(SingleGate::from_name("nope", None), None);
    }

    #[test]
    fn test_labels_and_families() {
        assert_eq!(SingleGate::H.label(), "H");
        assert_eq!(SingleGate::Sdg.label(), "S†");
        assert_eq!(SingleGate::Rx(PI / 2.0).label(), "Rx(π/2)");
        assert_eq!(SingleGate::H.family(), GateFamily::Hadamard);
        assert_eq!(SingleGate::Rz(1.0).family(), GateFamily::Phase);
        assert_eq!(ControlledGate::CX.family(), GateFamily::Multi);
        assert_eq!(ControlledGate::from_name("cnot"), Some(ControlledGate::CX));
    }
}
