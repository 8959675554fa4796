//! Reader for the weighted clause format:
//!
//! ```text
//! n m
//! w k l1 l2 ... lk     (m times)
//! ```
//!
//! `w` is a non-negative weight, `k` the literal count and each `li` a signed
//! variable index in `[-n, -1]` or `[1, n]`. Tokens may be split across lines
//! arbitrarily; anything after the last clause is ignored.

use crate::formula::{Clause, Instance, InstanceError, Literal};
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

pub fn parse<R: Read>(reader: R) -> Result<Instance, ParseError> {
    let reader = BufReader::new(reader);

    let mut tokens = vec![];
    for line in reader.lines() {
        let line = line?;
        tokens.extend(line.split_whitespace().map(String::from));
    }
    let mut tokens = tokens.into_iter();

    let num_variables: usize = next_token(&mut tokens, "num_variables")?;
    let num_clauses: usize = next_token(&mut tokens, "num_clauses")?;

    let mut clauses = Vec::with_capacity(num_clauses);
    for _ in 0..num_clauses {
        let weight: f64 = next_token(&mut tokens, "clause weight")?;
        let k: usize = next_token(&mut tokens, "literal count")?;
        let mut literals = Vec::with_capacity(k);
        for _ in 0..k {
            let l: i64 = next_token(&mut tokens, "literal")?;
            literals.push(Literal::from_signed(l));
        }
        clauses.push(Clause::new(weight, literals));
    }

    let instance = Instance::new(num_variables, clauses)?;
    log::debug!(
        "parsed {} variables, {} clauses, total weight {}",
        instance.num_variables(),
        instance.num_clauses(),
        instance.total_weight()
    );
    Ok(instance)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Instance, ParseError> {
    let file = File::open(path)?;
    parse(file)
}

fn next_token<T: FromStr>(tokens: &mut impl Iterator<Item = String>, what: &str) -> Result<T, ParseError> {
    let token = tokens
        .next()
        .ok_or_else(|| ParseError::Format(format!("truncated input: expected {}", what)))?;
    token
        .parse()
        .map_err(|_| ParseError::Format(format!("invalid {} '{}'", what, token)))
}

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Format(String),
    Instance(InstanceError),
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<InstanceError> for ParseError {
    fn from(e: InstanceError) -> Self {
        Self::Instance(e)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "i/o error: {}", e),
            ParseError::Format(s) => write!(f, "format error: {}", s),
            ParseError::Instance(e) => write!(f, "invalid instance: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}
