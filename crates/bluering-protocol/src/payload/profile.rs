//! User profile write.

use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::params::Params;

enum Domain {
    Choice(&'static [(&'static str, u8)]),
    Integer,
}

struct Field {
    name: &'static str,
    domain: Domain,
    default: u8,
}

/// Fields in wire order.
const FIELDS: [Field; 9] = [
    Field {
        name: "timeformat",
        domain: Domain::Choice(&[("12", 0x01), ("24", 0x00)]),
        default: 0x00,
    },
    Field {
        name: "system",
        domain: Domain::Choice(&[("metric", 0x00), ("imperial", 0x01)]),
        default: 0x00,
    },
    Field {
        name: "gender",
        domain: Domain::Choice(&[("male", 0x00), ("female", 0x01), ("other", 0x02)]),
        default: 0x02,
    },
    Field {
        name: "age",
        domain: Domain::Integer,
        default: 50,
    },
    Field {
        name: "height",
        domain: Domain::Integer,
        default: 165,
    },
    Field {
        name: "weight",
        domain: Domain::Integer,
        default: 70,
    },
    Field {
        name: "bp-sys",
        domain: Domain::Integer,
        default: 120,
    },
    Field {
        name: "bp-dia",
        domain: Domain::Integer,
        default: 80,
    },
    Field {
        name: "hr-lim",
        domain: Domain::Integer,
        default: 160,
    },
];

/// Parameter names accepted by the profile write, in wire order.
pub const PARAMS: [&str; FIELDS.len()] = field_names();

const fn field_names() -> [&'static str; FIELDS.len()] {
    let mut names = [""; FIELDS.len()];
    let mut i = 0;
    while i < FIELDS.len() {
        names[i] = FIELDS[i].name;
        i += 1;
    }
    names
}

/// Mode byte `02` then every field, defaults filled in.
pub fn encode(params: &Params, _: &ProtocolConfig) -> Result<Vec<u8>> {
    params.check_known(&PARAMS)?;
    let mut out = Vec::with_capacity(1 + FIELDS.len());
    out.push(0x02);
    for field in &FIELDS {
        let value = match field.domain {
            Domain::Choice(choices) => params.choice(field.name, choices)?,
            Domain::Integer => params.u8_in(field.name, 0..=u8::MAX)?,
        };
        out.push(value.unwrap_or(field.default));
    }
    Ok(out)
}
