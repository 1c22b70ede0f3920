//! Parsing of the scan output, one valve per line:
//!
//! ```text
//! Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
//! Valve HH has flow rate=22; tunnel leads to valve GG
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::error::{Error, Result};

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Valve (\w+) has flow rate=(\d+); tunnels? leads? to valves? (.+)$").unwrap()
});

/// One parsed line: a valve, its flow rate and the valves its tunnels lead to. Every tunnel
/// implicitly takes one minute to walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValveRecord {
    pub name: String,
    pub flow_rate: usize,
    pub tunnels: Vec<String>,
}

impl ValveRecord {
    pub fn new(name: &str, flow_rate: usize, tunnels: &[&str]) -> Self {
        ValveRecord {
            name: name.to_string(),
            flow_rate,
            tunnels: tunnels.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl FromStr for ValveRecord {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let Some(caps) = LINE_RE.captures(line) else {
            return Err(Error::MalformedLine { line: line.to_string() });
        };
        let name = caps[1].to_string();
        let flow_rate = caps[2].parse().map_err(|source| Error::InvalidFlowRate {
            valve: name.clone(),
            value: caps[2].to_string(),
            source,
        })?;

        let mut tunnels = Vec::new();
        for dst in caps[3].split(',').map(str::trim) {
            if dst.is_empty() {
                return Err(Error::MalformedLine { line: line.to_string() });
            }
            tunnels.push(dst.to_string());
        }
        Ok(ValveRecord { name, flow_rate, tunnels })
    }
}

/// Parse every non-blank line of `input`. Fails on the first malformed line.
pub fn parse_records(input: &str) -> Result<Vec<ValveRecord>> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ValveRecord::from_str)
        .collect()
}

/// Read scan output from `path`, or from stdin if there is none.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let input = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(input)
}
