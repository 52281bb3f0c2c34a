use super::{MU_0, nonzero, sin_degrees};
use crate::domain::NamedInputs;
use crate::error::DomainError;
use std::f64::consts::PI;

/// Angle used when `theta` is left empty: field perpendicular to the motion.
const DEFAULT_THETA: f64 = 90.0;

/// F = I·L·B·sin θ
pub fn force_on_wire(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let i = inputs.require("I")?;
    let l = inputs.require("L")?;
    let b = inputs.require("B")?;
    let theta = inputs.get("theta").unwrap_or(DEFAULT_THETA);
    Ok(i * l * b * sin_degrees(theta))
}

/// I = F / (L·B·sin θ)
pub fn current_from_force(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let f = inputs.require("F")?;
    let l = inputs.require("L")?;
    let b = inputs.require("B")?;
    let theta = inputs.get("theta").unwrap_or(DEFAULT_THETA);
    let denominator = nonzero(
        l * b * sin_degrees(theta),
        "cannot calculate current when L, B or sin θ is zero",
    )?;
    Ok(f / denominator)
}

/// F = q·v·B·sin θ
pub fn lorentz_force(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let q = inputs.require("q")?;
    let v = inputs.require("v")?;
    let b = inputs.require("B")?;
    let theta = inputs.get("theta").unwrap_or(DEFAULT_THETA);
    Ok(q * v * b * sin_degrees(theta))
}

/// Field of a straight wire (B = μ₀I / 2πr) or of a solenoid (B = μ₀NI / L),
/// depending on which alternative was entered.
pub fn magnetic_field(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let current = inputs.require("I_wire")?;

    if let Some(r) = inputs.get("r_wire") {
        let r = nonzero(r, "distance from the wire cannot be zero")?;
        return Ok(MU_0 * current / (2.0 * PI * r));
    }

    let turns = inputs.require("N")?;
    let length = nonzero(inputs.require("L")?, "solenoid length cannot be zero")?;
    Ok(MU_0 * turns * current / length)
}

/// F/l = μ₀·I₁·I₂ / 2πr
pub fn parallel_wires(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let i1 = inputs.require("I1")?;
    let i2 = inputs.require("I2")?;
    let r = nonzero(inputs.require("r")?, "separation distance cannot be zero")?;
    Ok(MU_0 * i1 * i2 / (2.0 * PI * r))
}

/// Ideal transformer: Vs = Vp·Ns / Np
pub fn transformer_secondary_voltage(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let vp = inputs.require("V_p")?;
    let np = nonzero(inputs.require("N_p")?, "primary turns cannot be zero")?;
    let ns = inputs.require("N_s")?;
    Ok(vp * ns / np)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn force_on_wire_defaults_to_perpendicular() {
        let inputs = NamedInputs::new().with("I", 5.0).with("L", 2.0).with("B", 0.1);
        assert!(close(force_on_wire(&inputs).unwrap(), 1.0));
    }

    #[test]
    fn current_from_force_rejects_parallel_field() {
        let inputs = NamedInputs::new()
            .with("F", 1.0)
            .with("L", 2.0)
            .with("B", 0.1)
            .with("theta", 0.0);
        assert!(matches!(
            current_from_force(&inputs),
            Err(DomainError::DivisionByZero(_))
        ));
    }

    #[test]
    fn current_from_force_accepts_tiny_divisors() {
        let inputs = NamedInputs::new()
            .with("F", 1e-15)
            .with("L", 1e-6)
            .with("B", 1e-7);
        assert!(close(current_from_force(&inputs).unwrap(), 0.01));
    }

    #[test]
    fn magnetic_field_picks_branch() {
        let wire = NamedInputs::new().with("I_wire", 10.0).with("r_wire", 0.05);
        assert!(close(magnetic_field(&wire).unwrap(), 4e-5));

        let solenoid = NamedInputs::new()
            .with("I_wire", 2.0)
            .with("N", 500.0)
            .with("L", 0.25);
        assert!(close(magnetic_field(&solenoid).unwrap(), MU_0 * 4000.0));

        let neither = NamedInputs::new().with("I_wire", 2.0);
        assert_eq!(
            magnetic_field(&neither),
            Err(DomainError::MissingInput("N".to_string()))
        );
    }
}
