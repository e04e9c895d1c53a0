//! Lowering of a parsed program into a validated `Circuit`

use tracing::{debug, warn};

use crate::circuit::{Circuit, ControlledGate, Operation, SingleGate, MAX_QUBITS};
use crate::parser::ast::*;
use crate::ParseError;

struct QuantumRegister {
    name: String,
    size: usize,
}

struct Lowering {
    qreg: Option<QuantumRegister>,
    circuit: Option<Circuit>,
    name: String,
}

/// Convert a program into a circuit named `name`
pub fn lower(program: &Program, name: &str) -> Result<Circuit, ParseError> {
    let mut state = Lowering {
        qreg: None,
        circuit: None,
        name: name.to_string(),
    };

    for stmt in &program.statements {
        state.statement(stmt)?;
    }

    match state.circuit {
        Some(circuit) => Ok(circuit),
        None => Err(ParseError::semantic(0..0, "program declares no quantum register")),
    }
}

impl Lowering {
    fn statement(&mut self, stmt: &Spanned<Statement>) -> Result<(), ParseError> {
        let span = stmt.span.clone();
        match &stmt.node {
            Statement::Version(version) => {
                if version.trunc() != 2.0 {
                    return Err(ParseError::semantic(
                        span,
                        format!("unsupported OpenQASM version {}", version),
                    ));
                }
            }
            Statement::Include(path) => {
                debug!(path = %path, "ignoring include");
            }
            Statement::QReg { name, size } => {
                check_size(name, *size)?;
                if let Some(existing) = &self.qreg {
                    return Err(ParseError::semantic(
                        name.span.clone(),
                        format!(
                            "only one quantum register is supported ('{}' already declared)",
                            existing.name
                        ),
                    ));
                }
                self.qreg = Some(QuantumRegister {
                    name: name.node.to_string(),
                    size: *size,
                });
                self.circuit = Some(Circuit::new(self.name.clone(), *size));
            }
            Statement::CReg { name, size } => {
                check_size(name, *size)?;
                let circuit = self.circuit_mut(&span)?;
                circuit
                    .add_creg(name.node.as_str(), *size)
                    .map_err(|e| ParseError::semantic(name.span.clone(), e.to_string()))?;
            }
            Statement::Gate(call) => self.gate(call, span)?,
            Statement::Barrier(operands) => {
                let mut qubits = Vec::new();
                for operand in operands {
                    for q in self.qubits(operand)? {
                        if !qubits.contains(&q) {
                            qubits.push(q);
                        }
                    }
                }
                self.push(Operation::Barrier { qubits }, &span)?;
            }
            Statement::Measure { qubit, clbit } => {
                let qubits = self.qubits(qubit)?;
                let clbits = self.clbits(clbit)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::semantic(
                        span,
                        format!(
                            "cannot measure {} qubits into {} clbits",
                            qubits.len(),
                            clbits.len()
                        ),
                    ));
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.push(Operation::Measure { qubit: q, clbit: c }, &span)?;
                }
            }
        }
        Ok(())
    }

    fn gate(&mut self, call: &GateCall, span: Span) -> Result<(), ParseError> {
        let name = call.name.node.as_str().to_ascii_lowercase();
        let params: Vec<f64> = call.params.iter().map(|p| p.node.eval()).collect();

        let arity = match name.as_str() {
            "swap" => 2,
            n if ControlledGate::from_name(n).is_some() => 2,
            _ => 1,
        };
        if call.args.len() != arity {
            return Err(ParseError::semantic(
                span,
                format!(
                    "gate '{}' expects {} qubit operand(s), got {}",
                    name,
                    arity,
                    call.args.len()
                ),
            ));
        }

        let operands = call
            .args
            .iter()
            .map(|a| self.qubits(a))
            .collect::<Result<Vec<_>, _>>()?;
        let width = broadcast_width(&operands).ok_or_else(|| {
            ParseError::semantic(span.clone(), "operand registers differ in size")
        })?;

        for i in 0..width {
            let pick = |k: usize| {
                let qs = &operands[k];
                if qs.len() == 1 {
                    qs[0]
                } else {
                    qs[i]
                }
            };

            let op = if name == "swap" {
                if !params.is_empty() {
                    return Err(ParseError::semantic(span, "gate 'swap' takes no parameters"));
                }
                Operation::Swap {
                    a: pick(0),
                    b: pick(1),
                }
            } else if let Some(gate) = ControlledGate::from_name(&name) {
                if !params.is_empty() {
                    return Err(ParseError::semantic(
                        span,
                        format!("gate '{}' takes no parameters", name),
                    ));
                }
                Operation::Controlled {
                    gate,
                    control: pick(0),
                    target: pick(1),
                }
            } else {
                let gate = match params.as_slice() {
                    [] => SingleGate::from_name(&name, None),
                    [theta] => SingleGate::from_name(&name, Some(*theta)),
                    _ => None,
                }
                .ok_or_else(|| {
                    ParseError::semantic(
                        call.name.span.clone(),
                        format!(
                            "unknown gate '{}' with {} parameter(s)",
                            name,
                            params.len()
                        ),
                    )
                })?;
                Operation::Single {
                    gate,
                    qubit: pick(0),
                }
            };

            self.push(op, &span)?;
        }
        Ok(())
    }

    fn circuit_mut(&mut self, span: &Span) -> Result<&mut Circuit, ParseError> {
        self.circuit
            .as_mut()
            .ok_or_else(|| ParseError::semantic(span.clone(), "no quantum register declared yet"))
    }

    fn push(&mut self, op: Operation, span: &Span) -> Result<(), ParseError> {
        let circuit = self.circuit_mut(span)?;
        circuit
            .append(op)
            .map_err(|e| ParseError::semantic(span.clone(), e.to_string()))?;
        Ok(())
    }

    /// Expand a quantum operand into qubit indices
    fn qubits(&self, operand: &Spanned<Operand>) -> Result<Vec<usize>, ParseError> {
        let reg = match &self.qreg {
            Some(reg) if reg.name == operand.node.register.as_str() => reg,
            _ => {
                return Err(ParseError::semantic(
                    operand.span.clone(),
                    format!("unknown quantum register '{}'", operand.node.register),
                ))
            }
        };
        expand(operand, reg.size, 0)
    }

    /// Expand a classical operand into global clbit indices
    fn clbits(&self, operand: &Spanned<Operand>) -> Result<Vec<usize>, ParseError> {
        let reg = self
            .circuit
            .as_ref()
            .and_then(|c| {
                c.registers()
                    .iter()
                    .find(|r| r.name == operand.node.register.as_str())
            })
            .ok_or_else(|| {
                ParseError::semantic(
                    operand.span.clone(),
                    format!("unknown classical register '{}'", operand.node.register),
                )
            })?;
        expand(operand, reg.size, reg.start)
    }
}

fn check_size(name: &Spanned<Identifier>, size: usize) -> Result<(), ParseError> {
    if size > MAX_QUBITS {
        return Err(ParseError::semantic(
            name.span.clone(),
            format!(
                "register '{}' has {} bits, at most {} are supported",
                name.node, size, MAX_QUBITS
            ),
        ));
    }
    Ok(())
}

fn expand(operand: &Spanned<Operand>, size: usize, offset: usize) -> Result<Vec<usize>, ParseError> {
    match operand.node.index {
        Some(i) if i < size => Ok(vec![offset + i]),
        Some(i) => Err(ParseError::semantic(
            operand.span.clone(),
            format!(
                "index {} out of range for register '{}' of size {}",
                i, operand.node.register, size
            ),
        )),
        None => {
            if size == 0 {
                warn!(register = %operand.node.register, "operand names an empty register");
            }
            Ok((offset..offset + size).collect())
        }
    }
}

/// Common length of broadcast operands; single bits repeat
fn broadcast_width(operands: &[Vec<usize>]) -> Option<usize> {
    let mut width = 1;
    for qs in operands {
        match qs.len() {
            1 => {}
            n if width == 1 || width == n => width = n,
            _ => return None,
        }
    }
    Some(width)
}
