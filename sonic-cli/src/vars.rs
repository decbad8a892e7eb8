//! Execution variables
//!
//! `--var KEY=VALUE` pairs substituted into `${KEY}` placeholders of stage
//! environment values and volume paths.

use std::collections::BTreeMap;

/// Variables passed on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecVars(BTreeMap<String, String>);

impl ExecVars {
    /// Parses `KEY=VALUE` strings
    ///
    /// Entries without `=` or with an empty value are ignored. Only the first
    /// `=` separates key from value. Later duplicates win.
    pub fn parse<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = vars
            .into_iter()
            .filter_map(|var| {
                let (key, value) = var.as_ref().split_once('=')?;
                (!value.is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect();

        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces every `${KEY}` with its value; unknown placeholders are left alone
    pub fn resolve(&self, s: &str) -> String {
        self.0.iter().fold(s.to_string(), |acc, (key, value)| {
            acc.replace(&format!("${{{}}}", key), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let vars = ExecVars::parse([
            "HOME=/home/user",
            "EMPTY=",
            "NOEQUALS",
            "URL=http://host/?a=b",
        ]);

        assert_eq!(vars.0.len(), 2);
        assert_eq!(vars.0["HOME"], "/home/user");
        assert_eq!(vars.0["URL"], "http://host/?a=b");
        assert!(!vars.0.contains_key("EMPTY"));
        assert!(!vars.0.contains_key("NOEQUALS"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(ExecVars::parse(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_resolve() {
        let vars = ExecVars::parse(["HOME=/home/user", "ENV=prod"]);

        assert_eq!(
            vars.resolve("${HOME}/.cache/go-build"),
            "/home/user/.cache/go-build"
        );
        assert_eq!(vars.resolve("${ENV}-${ENV}"), "prod-prod");
        assert_eq!(vars.resolve("${MISSING}/x"), "${MISSING}/x");
        assert_eq!(vars.resolve("$HOME"), "$HOME");
        assert_eq!(vars.resolve("no vars"), "no vars");
    }
}
