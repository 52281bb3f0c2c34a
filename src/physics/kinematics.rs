use super::nonzero;
use crate::domain::NamedInputs;
use crate::error::DomainError;

/// The five quantities of motion with constant acceleration.
const SUVAT: [&str; 5] = ["u", "v", "a", "s", "t"];

/// t = (v − u) / a
pub fn elapsed_time(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let u = inputs.require("u")?;
    let v = inputs.require("v")?;
    let a = nonzero(
        inputs.require("a")?,
        "cannot calculate time with zero acceleration",
    )?;
    Ok((v - u) / a)
}

/// s = u·t + ½·a·t²
pub fn displacement(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let u = inputs.require("u")?;
    let a = inputs.require("a")?;
    let t = inputs.require("t")?;
    Ok(u * t + 0.5 * a * t * t)
}

/// One way of solving for `target` once all of `given` are known.
struct Rearrangement {
    target: &'static str,
    given: [&'static str; 3],
    solve: fn(&NamedInputs) -> Result<f64, DomainError>,
}

/// Tried in order. Between them every three of the five quantities determine the rest.
const REARRANGEMENTS: &[Rearrangement] = &[
    Rearrangement {
        target: "v",
        given: ["u", "a", "t"],
        solve: |x| Ok(x.require("u")? + x.require("a")? * x.require("t")?),
    },
    Rearrangement {
        target: "u",
        given: ["v", "a", "t"],
        solve: |x| Ok(x.require("v")? - x.require("a")? * x.require("t")?),
    },
    Rearrangement {
        target: "a",
        given: ["u", "v", "t"],
        solve: |x| {
            let t = nonzero(x.require("t")?, "cannot find acceleration over zero time")?;
            Ok((x.require("v")? - x.require("u")?) / t)
        },
    },
    Rearrangement {
        target: "t",
        given: ["u", "v", "a"],
        solve: elapsed_time,
    },
    Rearrangement {
        target: "s",
        given: ["u", "v", "t"],
        solve: |x| Ok(0.5 * (x.require("u")? + x.require("v")?) * x.require("t")?),
    },
    Rearrangement {
        target: "s",
        given: ["u", "a", "t"],
        solve: displacement,
    },
    Rearrangement {
        target: "v",
        given: ["u", "a", "s"],
        solve: |x| {
            let u = x.require("u")?;
            real_sqrt(u * u + 2.0 * x.require("a")? * x.require("s")?)
        },
    },
    Rearrangement {
        target: "u",
        given: ["v", "a", "s"],
        solve: |x| {
            let v = x.require("v")?;
            real_sqrt(v * v - 2.0 * x.require("a")? * x.require("s")?)
        },
    },
    Rearrangement {
        target: "a",
        given: ["u", "v", "s"],
        solve: |x| {
            let (u, v) = (x.require("u")?, x.require("v")?);
            let s = nonzero(
                x.require("s")?,
                "cannot find acceleration over zero displacement",
            )?;
            Ok((v * v - u * u) / (2.0 * s))
        },
    },
    Rearrangement {
        target: "t",
        given: ["u", "a", "s"],
        solve: time_to_cover,
    },
    Rearrangement {
        target: "t",
        given: ["u", "v", "s"],
        solve: |x| {
            let sum = nonzero(
                x.require("u")? + x.require("v")?,
                "cannot find time when u + v is zero",
            )?;
            Ok(2.0 * x.require("s")? / sum)
        },
    },
    Rearrangement {
        target: "a",
        given: ["u", "s", "t"],
        solve: |x| {
            let t = nonzero(x.require("t")?, "cannot find acceleration over zero time")?;
            Ok(2.0 * (x.require("s")? - x.require("u")? * t) / (t * t))
        },
    },
    Rearrangement {
        target: "u",
        given: ["v", "s", "t"],
        solve: |x| {
            let t = nonzero(x.require("t")?, "cannot find initial velocity over zero time")?;
            Ok(2.0 * x.require("s")? / t - x.require("v")?)
        },
    },
    Rearrangement {
        target: "u",
        given: ["a", "s", "t"],
        solve: |x| {
            let t = nonzero(x.require("t")?, "cannot find initial velocity over zero time")?;
            Ok(x.require("s")? / t - 0.5 * x.require("a")? * t)
        },
    },
];

fn real_sqrt(square: f64) -> Result<f64, DomainError> {
    if square < 0.0 {
        return Err(DomainError::Undefined(
            "no real velocity satisfies v² = u² + 2as".to_string(),
        ));
    }
    Ok(square.sqrt())
}

/// Earliest non-negative t with s = u·t + ½·a·t².
fn time_to_cover(inputs: &NamedInputs) -> Result<f64, DomainError> {
    let u = inputs.require("u")?;
    let a = inputs.require("a")?;
    let s = inputs.require("s")?;

    if a == 0.0 {
        let u = nonzero(
            u,
            "cannot find time with zero velocity and zero acceleration",
        )?;
        return Ok(s / u);
    }

    let discriminant = u * u + 2.0 * a * s;
    if discriminant < 0.0 {
        return Err(DomainError::Undefined(
            "the displacement is never reached".to_string(),
        ));
    }
    let root = discriminant.sqrt();
    [(-u + root) / a, (-u - root) / a]
        .into_iter()
        .filter(|t| *t >= 0.0)
        .min_by(f64::total_cmp)
        .ok_or_else(|| DomainError::Undefined("the displacement is never reached".to_string()))
}

/// Solves u, v, a, s and t from any three of them.
///
/// Rearrangements are applied until nothing new can be derived. A quantity that stays
/// unknown reports the first rearrangement error, or [`DomainError::MissingInput`]
/// when too little was given to try one.
pub fn suvat(inputs: &NamedInputs) -> Result<NamedInputs, DomainError> {
    let mut known = inputs.clone();
    let mut failed = vec![false; REARRANGEMENTS.len()];
    let mut first_error = None;

    while let Some(index) = REARRANGEMENTS.iter().enumerate().position(|(i, r)| {
        !failed[i] && !known.contains(r.target) && r.given.iter().all(|g| known.contains(g))
    }) {
        let rule = &REARRANGEMENTS[index];
        match (rule.solve)(&known) {
            Ok(value) if value.is_finite() => known.insert(rule.target, value),
            Ok(_) => {
                failed[index] = true;
                first_error.get_or_insert_with(|| {
                    DomainError::Undefined(format!("{} is not finite", rule.target))
                });
            }
            Err(e) => {
                failed[index] = true;
                first_error.get_or_insert(e);
            }
        }
    }

    match SUVAT.iter().find(|name| !known.contains(name)) {
        None => Ok(known),
        Some(name) => {
            Err(first_error.unwrap_or_else(|| DomainError::MissingInput(name.to_string())))
        }
    }
}
