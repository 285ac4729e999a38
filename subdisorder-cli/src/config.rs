//! The INDSOD configuration file (SPEC_FULL.md §6, §10.4): a small
//! `key = value` record, one field per line, with a fixed, known field set.
//! Not a general namelist parser — there is no need for one at this scale.
//! Line-oriented, comment-skipping, tolerant-of-whitespace, in the same spirit
//! as the small structure-file readers in the pack (e.g. an SPR-KKR input
//! reader that dispatches on a keyword per line).

use std::collections::HashMap;

use crate::error::CliError;

const MAX_SPECIES: usize = 5;
const DEFAULT_PREC: f64 = 1e-5;
const MAX_PREC: f64 = 1e-2;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub nsub: usize,
    /// Species multiplicities, length `nsub`.
    pub subs: Vec<usize>,
    /// Two-character species labels, length `nsub`.
    pub symb: Vec<String>,
    pub prec: f64,
    /// 1-based index into the structure's atom types.
    pub site: usize,
    pub leqa: bool,
    pub lspg: bool,
    pub lcfg: bool,
    pub lpos: bool,
    pub lpro: bool,
}

impl Config {
    /// Parse the record, applying defaults for omitted keys. Does not perform
    /// the cross-field validation that needs the structural input (that is
    /// [`Config::validate`], run once the POSCAR/SPOSCAR has been read).
    pub fn parse(text: &str) -> Result<Self, CliError> {
        let fields = parse_fields(text)?;

        let nsub = match fields.get("nsub") {
            Some(v) => parse_int(v, "nsub")?,
            None => 2,
        };
        if !(2..=MAX_SPECIES).contains(&nsub) {
            return Err(CliError::Config(format!(
                "nsub must be between 2 and {}, got {}",
                MAX_SPECIES, nsub
            )));
        }

        let subs_all = match fields.get("subs") {
            Some(v) => parse_int_list(v, "subs")?,
            None => return Err(CliError::Config("missing required field: subs".to_string())),
        };
        if subs_all.len() < nsub {
            return Err(CliError::Config(format!(
                "subs has {} entries but nsub={}",
                subs_all.len(),
                nsub
            )));
        }
        let subs: Vec<usize> = subs_all[..nsub].to_vec();
        if subs.iter().any(|&k| k == 0) {
            return Err(CliError::Config(
                "every entry of subs must be greater than zero".to_string(),
            ));
        }

        let symb_all = match fields.get("symb") {
            Some(v) => parse_str_list(v),
            None => return Err(CliError::Config("missing required field: symb".to_string())),
        };
        if symb_all.len() != nsub {
            return Err(CliError::Config(format!(
                "symb has {} entries but nsub={}",
                symb_all.len(),
                nsub
            )));
        }
        let symb = symb_all;

        let prec = match fields.get("prec") {
            Some(v) => parse_float(v, "prec")?,
            None => DEFAULT_PREC,
        };
        if prec > MAX_PREC {
            return Err(CliError::Config(format!(
                "prec must be at most {}, got {}",
                MAX_PREC, prec
            )));
        }

        let site = match fields.get("site") {
            Some(v) => parse_int(v, "site")?,
            None => 1,
        };

        let leqa = parse_bool_field(&fields, "leqa", false)?;
        let lspg = parse_bool_field(&fields, "lspg", false)?;
        let lcfg = parse_bool_field(&fields, "lcfg", true)?;
        let lpos = parse_bool_field(&fields, "lpos", false)?;
        let lpro = parse_bool_field(&fields, "lpro", false)?;

        Ok(Self {
            nsub,
            subs,
            symb,
            prec,
            site,
            leqa,
            lspg,
            lcfg,
            lpos,
            lpro,
        })
    }

    /// Cross-field validation that needs the structural input (SPEC_FULL.md
    /// §6): the requested species counts must sum to the number of atoms of
    /// the chosen type, and `site` must actually index a type.
    pub fn validate(&self, type_counts: &[usize]) -> Result<(), CliError> {
        if self.site == 0 || self.site > type_counts.len() {
            return Err(CliError::Config(format!(
                "site={} does not index a type in the structure (found {} types)",
                self.site,
                type_counts.len()
            )));
        }
        let site_count = type_counts[self.site - 1];
        let requested: usize = self.subs.iter().sum();
        if requested != site_count {
            return Err(CliError::Config(format!(
                "subs sums to {} but type {} has {} atoms",
                requested, self.site, site_count
            )));
        }
        Ok(())
    }
}

fn parse_fields(text: &str) -> Result<HashMap<String, String>, CliError> {
    let mut fields = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            CliError::Config(format!("malformed record line: {:?}", line))
        })?;
        fields.insert(key.trim().to_lowercase(), value.trim().to_string());
    }
    Ok(fields)
}

fn parse_int(value: &str, field: &str) -> Result<usize, CliError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| CliError::Config(format!("{} must be a non-negative integer, got {:?}", field, value)))
}

fn parse_float(value: &str, field: &str) -> Result<f64, CliError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::Config(format!("{} must be a real number, got {:?}", field, value)))
}

fn parse_int_list(value: &str, field: &str) -> Result<Vec<usize>, CliError> {
    value
        .split(',')
        .map(|s| parse_int(s, field))
        .collect()
}

fn parse_str_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_bool_field(fields: &HashMap<String, String>, key: &str, default: bool) -> Result<bool, CliError> {
    match fields.get(key) {
        None => Ok(default),
        Some(v) => parse_bool(v, key),
    }
}

fn parse_bool(value: &str, field: &str) -> Result<bool, CliError> {
    match value.trim().to_lowercase().as_str() {
        ".true." | "t" | "true" => Ok(true),
        ".false." | "f" | "false" => Ok(false),
        other => Err(CliError::Config(format!(
            "{} must be a boolean (.true./.false./t/f), got {:?}",
            field, other
        ))),
    }
}
