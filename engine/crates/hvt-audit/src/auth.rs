//! Authentication, authorization and local-account auditors
//!
//! Every auditor is a pure function of the configuration snapshot: it runs
//! its own queries and returns a self-contained result.

use crate::checks::fixed_pattern;
use crate::source::ConfigSource;
use hvt_core::{Error, Result, RuleResult};
use serde::Serialize;
use std::fmt;

pub const LOCAL_USERS_WEIGHT: u32 = 5;
pub const AAA_NEW_MODEL_WEIGHT: u32 = 5;
pub const TACACS_SERVERS_WEIGHT: u32 = 5;
pub const RADIUS_SERVERS_WEIGHT: u32 = 2;
pub const TACACS_SOURCE_WEIGHT: u32 = 2;
pub const RADIUS_SOURCE_WEIGHT: u32 = 1;
pub const METHOD_CHAIN_WEIGHT: u32 = 3;
pub const VTY_AUTH_WEIGHT: u32 = 2;
/// Score for having any command authorization; level 15 coverage earns the full weight
pub const COMMAND_AUTHZ_PARTIAL: u32 = 3;
pub const COMMAND_AUTHZ_WEIGHT: u32 = 5;
pub const MAX_FAIL_WEIGHT: u32 = 2;
/// Highest accepted `max-fail` value
pub const MAX_FAIL_THRESHOLD: u32 = 3;

/// VTY ranges checked for a login authentication list
pub const VTY_RANGES: [(&str, &str); 3] = [
    ("0 4", r"0\s+4"),
    ("5 15", r"5\s+15"),
    ("16 31", r"16\s+31"),
];

const PRIVILEGE_ADMIN: u32 = 15;

/// One method in an AAA method list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    Default,
    Local,
    None,
    GroupTacacs,
    GroupRadius,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Default => "default",
            AuthMethod::Local => "local",
            AuthMethod::None => "none",
            AuthMethod::GroupTacacs => "group tacacs+",
            AuthMethod::GroupRadius => "group radius",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Methods accepted in login / enable / exec statements
const CHAIN_METHODS: &[AuthMethod] = &[
    AuthMethod::Default,
    AuthMethod::Local,
    AuthMethod::GroupTacacs,
    AuthMethod::GroupRadius,
];
/// Methods recorded for privilege 15 command authorization
const PRIV15_COMMAND_METHODS: &[AuthMethod] =
    &[AuthMethod::Default, AuthMethod::None, AuthMethod::GroupTacacs];
/// Methods recorded for other command authorization levels
const PRIV1_COMMAND_METHODS: &[AuthMethod] =
    &[AuthMethod::Default, AuthMethod::Local, AuthMethod::GroupTacacs];

/// Ordered methods pulled from a statement tail, keeping only `accepted` ones.
/// `group` is only recognised together with the server type that follows it.
pub fn extract_methods(tail: &str, accepted: &[AuthMethod]) -> Vec<AuthMethod> {
    let mut methods = Vec::new();
    let mut tokens = tail.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let method = match token {
            "default" => Some(AuthMethod::Default),
            "local" => Some(AuthMethod::Local),
            "none" => Some(AuthMethod::None),
            "group" => match tokens.peek().copied() {
                Some("tacacs+") => {
                    tokens.next();
                    Some(AuthMethod::GroupTacacs)
                }
                Some("radius") => {
                    tokens.next();
                    Some(AuthMethod::GroupRadius)
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(method) = method.filter(|m| accepted.contains(m)) {
            methods.push(method);
        }
    }

    methods
}

fn method_strings(methods: &[AuthMethod]) -> Vec<String> {
    methods.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Local accounts
// ---------------------------------------------------------------------------

/// A `username` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalUser {
    pub name: String,
    /// Explicit `privilege <n>` value, 1 when the clause is absent
    pub privilege_level: u32,
}

impl LocalUser {
    pub fn is_admin(&self) -> bool {
        self.privilege_level == PRIVILEGE_ADMIN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalUserAudit {
    pub result: RuleResult,
    pub users: Vec<LocalUser>,
    /// Users below privilege 15
    pub priv1: Vec<String>,
    /// Users with an explicit `privilege 15`
    pub priv15: Vec<String>,
}

impl LocalUserAudit {
    pub fn priv1_present(&self) -> bool {
        !self.priv1.is_empty()
    }

    pub fn priv15_present(&self) -> bool {
        !self.priv15.is_empty()
    }
}

/// Local accounts should exist for fallback, none of them at privilege 15
pub fn local_users<S: ConfigSource + ?Sized>(src: &S) -> Result<LocalUserAudit> {
    let username = fixed_pattern(r"^username\s+(\S+)")?;
    let privilege = fixed_pattern(r"\sprivilege\s+(\d+)")?;

    let mut users = Vec::new();
    for line in src.find_lines(&username) {
        let Some(caps) = username.captures(&line.text) else {
            continue;
        };
        let name_end = caps.get(0).map_or(0, |m| m.end());
        let privilege_level = privilege
            .captures(&line.text[name_end..])
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(1);
        users.push(LocalUser {
            name: caps[1].to_string(),
            privilege_level,
        });
    }

    let (admins, others): (Vec<&LocalUser>, Vec<&LocalUser>) =
        users.iter().partition(|u| u.is_admin());
    let priv15: Vec<String> = admins.iter().map(|u| u.name.clone()).collect();
    let priv1: Vec<String> = others.iter().map(|u| u.name.clone()).collect();

    let result = if !priv1.is_empty() && priv15.is_empty() {
        RuleResult::pass(LOCAL_USERS_WEIGHT)
    } else {
        RuleResult::fail(LOCAL_USERS_WEIGHT)
    }
    .with_evidence(users.iter().map(|u| u.name.clone()));

    Ok(LocalUserAudit {
        result,
        users,
        priv1,
        priv15,
    })
}

// ---------------------------------------------------------------------------
// AAA model and servers
// ---------------------------------------------------------------------------

/// Full score when `aaa new-model` is absent.
// TODO: confirm with the policy owners whether presence should score instead.
pub fn aaa_new_model<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let pattern = fixed_pattern(r"^aaa\s+new-model\s*$")?;
    let present = src.count_matches(&pattern) > 0;

    Ok(if present {
        RuleResult::fail(AAA_NEW_MODEL_WEIGHT).with_evidence(["aaa new-model"])
    } else {
        RuleResult::pass(AAA_NEW_MODEL_WEIGHT)
    })
}

/// `tacacs-server host <ipv4-or-fqdn>`; evidence is the server addresses
pub fn tacacs_servers<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let pattern = fixed_pattern(
        r"^tacacs-server\s+host\s+((?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)|(?:(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-_]*[a-zA-Z0-9])\.)+[a-zA-Z]{2,})(?:\s|$)",
    )?;
    let hosts = captured(src, &pattern);

    Ok(presence(TACACS_SERVERS_WEIGHT, hosts))
}

/// `radius server <name>`; evidence is the server names
pub fn radius_servers<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let pattern = fixed_pattern(r"^radius\s+server\s+(\S+)\s*$")?;
    let servers = captured(src, &pattern);

    Ok(presence(RADIUS_SERVERS_WEIGHT, servers))
}

/// Global `ip tacacs source-interface <if>`
pub fn tacacs_source_interface<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let pattern = fixed_pattern(r"^ip\s+tacacs\s+source-interface\s+(\S+)\s*$")?;
    let interface = src.find_first_typed(&pattern, "");

    Ok(presence(
        TACACS_SOURCE_WEIGHT,
        Some(interface).filter(|i| !i.is_empty()),
    ))
}

/// Global `ip radius source-interface <if>`, overridden by the last one
/// configured inside an `aaa group server radius` block
pub fn radius_source_interface<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let global = fixed_pattern(r"^ip\s+radius\s+source-interface\s+(\S+)")?;
    let group = fixed_pattern(r"^aaa\s+group\s+server\s+radius\s+(\S+)")?;
    let nested = fixed_pattern(r"^\s+ip\s+radius\s+source-interface\s+(\S+)")?;

    let mut interface = Some(src.find_first_typed(&global, "")).filter(|i| !i.is_empty());
    for child in src.find_child_lines(&group, &nested) {
        if let Some(caps) = nested.captures(&child.text) {
            interface = Some(caps[1].to_string());
        }
    }

    Ok(presence(RADIUS_SOURCE_WEIGHT, interface))
}

// ---------------------------------------------------------------------------
// Method lists
// ---------------------------------------------------------------------------

/// `aaa authentication login ...`
pub fn authentication_login<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    method_chain(src, r"authentication\s+login")
}

/// `aaa authentication enable ...`
pub fn authentication_enable<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    method_chain(src, r"authentication\s+enable")
}

/// `aaa authorization exec ...`
pub fn authorization_exec<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    method_chain(src, r"authorization\s+exec")
}

/// Any statement of this kind passes; evidence is its methods in order
fn method_chain<S: ConfigSource + ?Sized>(src: &S, statement: &str) -> Result<RuleResult> {
    let pattern = fixed_pattern(&format!(r"^aaa\s+{}\s+(.*)", statement))?;
    let Some(line) = src.find_lines(&pattern).into_iter().next() else {
        return Ok(RuleResult::fail(METHOD_CHAIN_WEIGHT));
    };

    let tail = pattern
        .captures(&line.text)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str());
    let methods = extract_methods(tail, CHAIN_METHODS);

    Ok(RuleResult::pass(METHOD_CHAIN_WEIGHT).with_evidence(method_strings(&methods)))
}

/// Login authentication found under one VTY range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VtyRangeAuth {
    /// Range as written after `line vty` (e.g. "0 4")
    pub range: String,
    /// Method list names, or `["default"]` when none is configured
    pub methods: Vec<String>,
    pub configured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VtyAuthAudit {
    /// `evidence` keeps the legacy layout: each unconfigured range appends
    /// `default`, each configured range replaces the list with its methods
    pub result: RuleResult,
    /// The same findings kept per range
    pub by_range: Vec<VtyRangeAuth>,
}

/// `login authentication <list>` under `line vty 0 4`, `5 15` and `16 31`
pub fn vty_login_authentication<S: ConfigSource + ?Sized>(src: &S) -> Result<VtyAuthAudit> {
    let login = fixed_pattern(r"^\s+login\s+authentication\s+(\S+)")?;

    let mut evidence: Vec<String> = Vec::new();
    let mut satisfied = false;
    let mut by_range = Vec::with_capacity(VTY_RANGES.len());

    for (range, range_pattern) in VTY_RANGES {
        let stanza = fixed_pattern(&format!(r"^line\s+vty\s+{}\s*$", range_pattern))?;
        let children = src.find_child_lines(&stanza, &login);

        if children.is_empty() {
            evidence.push("default".to_string());
            by_range.push(VtyRangeAuth {
                range: range.to_string(),
                methods: vec!["default".to_string()],
                configured: false,
            });
            continue;
        }

        let methods: Vec<String> = children
            .iter()
            .filter_map(|c| login.captures(&c.text).map(|caps| caps[1].to_string()))
            .collect();
        satisfied = true;
        evidence = methods.clone();
        by_range.push(VtyRangeAuth {
            range: range.to_string(),
            methods,
            configured: true,
        });
    }

    let result = if satisfied {
        RuleResult::pass(VTY_AUTH_WEIGHT)
    } else {
        RuleResult::fail(VTY_AUTH_WEIGHT)
    }
    .with_evidence(evidence);

    Ok(VtyAuthAudit { result, by_range })
}

// ---------------------------------------------------------------------------
// Command authorization
// ---------------------------------------------------------------------------

/// One `aaa authorization commands <level> ...` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandAuthorizationRule {
    pub privilege_level: u32,
    pub methods: Vec<AuthMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandAuthorizationAudit {
    pub result: RuleResult,
    pub rules: Vec<CommandAuthorizationRule>,
    /// Methods of the last statement below privilege 15
    pub priv1: Vec<String>,
    /// Methods of the last privilege 15 statement
    pub priv15: Vec<String>,
}

impl CommandAuthorizationAudit {
    pub fn priv1_present(&self) -> bool {
        self.rules.iter().any(|r| r.privilege_level != PRIVILEGE_ADMIN)
    }

    pub fn priv15_present(&self) -> bool {
        self.rules.iter().any(|r| r.privilege_level == PRIVILEGE_ADMIN)
    }
}

pub fn command_authorization<S: ConfigSource + ?Sized>(
    src: &S,
) -> Result<CommandAuthorizationAudit> {
    let statement = fixed_pattern(r"^aaa\s+authorization\s+commands\s+(.*)")?;
    let level_and_methods = fixed_pattern(r"^(\d+)\s+(.*)")?;

    let mut tails = Vec::new();
    let mut rules = Vec::new();
    let mut priv1 = Vec::new();
    let mut priv15 = Vec::new();

    for line in src.find_lines(&statement) {
        let Some(tail) = statement.captures(&line.text).and_then(|c| c.get(1)) else {
            continue;
        };
        let tail = tail.as_str().trim();
        tails.push(tail.to_string());

        let Some(caps) = level_and_methods.captures(tail) else {
            continue;
        };
        let privilege_level: u32 = caps[1]
            .parse()
            .map_err(|_| Error::Parse(format!("privilege level in '{}'", line.trimmed())))?;

        let methods = if privilege_level == PRIVILEGE_ADMIN {
            let methods = extract_methods(&caps[2], PRIV15_COMMAND_METHODS);
            priv15 = method_strings(&methods);
            methods
        } else {
            let methods = extract_methods(&caps[2], PRIV1_COMMAND_METHODS);
            priv1 = method_strings(&methods);
            methods
        };
        rules.push(CommandAuthorizationRule {
            privilege_level,
            methods,
        });
    }

    let result = if tails.is_empty() {
        RuleResult::fail(COMMAND_AUTHZ_WEIGHT)
    } else if rules.iter().any(|r| r.privilege_level == PRIVILEGE_ADMIN) {
        RuleResult::pass(COMMAND_AUTHZ_WEIGHT)
    } else {
        RuleResult::scored(COMMAND_AUTHZ_PARTIAL, COMMAND_AUTHZ_WEIGHT, true)
    }
    .with_evidence(tails);

    Ok(CommandAuthorizationAudit {
        result,
        rules,
        priv1,
        priv15,
    })
}

/// `aaa local authentication attempts max-fail <n>` with `0 < n <= 3`
pub fn max_fail<S: ConfigSource + ?Sized>(src: &S) -> Result<RuleResult> {
    let pattern =
        fixed_pattern(r"^aaa\s+local\s+authentication\s+attempts\s+max-fail\s+(\d+)")?;
    let raw = src.find_first_typed(&pattern, "0");
    let attempts: u32 = raw
        .parse()
        .map_err(|_| Error::Parse(format!("max-fail value '{}'", raw)))?;

    let result = if attempts > 0 && attempts <= MAX_FAIL_THRESHOLD {
        RuleResult::pass(MAX_FAIL_WEIGHT)
    } else {
        RuleResult::fail(MAX_FAIL_WEIGHT)
    };
    Ok(if attempts > 0 {
        result.with_evidence([attempts.to_string()])
    } else {
        result
    })
}

/// Capture group 1 of every matching line
fn captured<S: ConfigSource + ?Sized>(src: &S, pattern: &regex::Regex) -> Vec<String> {
    src.find_lines(pattern)
        .iter()
        .filter_map(|line| pattern.captures(&line.text).map(|c| c[1].to_string()))
        .collect()
}

/// Full weight when anything was found, with the findings as evidence
fn presence<I: IntoIterator<Item = String>>(weight: u32, found: I) -> RuleResult {
    let found: Vec<String> = found.into_iter().collect();
    if found.is_empty() {
        RuleResult::fail(weight)
    } else {
        RuleResult::pass(weight).with_evidence(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ParsedConfig;

    fn cfg(text: &str) -> ParsedConfig {
        ParsedConfig::parse(text)
    }

    #[test]
    fn test_local_users_mixed_privileges() {
        let config = cfg("username bob privilege 15 secret 9 $9$x\nusername alice secret x\n");
        let audit = local_users(&config).unwrap();

        assert_eq!(audit.priv15, vec!["bob"]);
        assert_eq!(audit.priv1, vec!["alice"]);
        assert!(audit.priv1_present() && audit.priv15_present());
        assert_eq!(audit.result.achieved, 0);
        assert!(!audit.result.satisfied);
    }

    #[test]
    fn test_local_users_only_unprivileged() {
        let audit = local_users(&cfg("username alice secret x\n")).unwrap();
        assert_eq!(audit.priv1, vec!["alice"]);
        assert!(audit.priv15.is_empty());
        assert_eq!(audit.result.achieved, 5);
        assert!(audit.result.satisfied);
    }

    #[test]
    fn test_local_users_none_configured() {
        let audit = local_users(&cfg("hostname r1\n")).unwrap();
        assert!(audit.users.is_empty());
        assert_eq!(audit.result.achieved, 0);
    }

    #[test]
    fn test_local_users_explicit_low_privilege() {
        let audit =
            local_users(&cfg("username ops privilege 7 secret x\nusername ro privilege 1 secret y\n"))
                .unwrap();
        assert_eq!(audit.priv1, vec!["ops", "ro"]);
        assert_eq!(audit.users[0].privilege_level, 7);
        assert_eq!(audit.result.achieved, 5);
    }

    #[test]
    fn test_aaa_new_model_scored_when_absent() {
        assert_eq!(aaa_new_model(&cfg("hostname r1\n")).unwrap().achieved, 5);

        let present = aaa_new_model(&cfg("aaa new-model\n")).unwrap();
        assert_eq!(present.achieved, 0);
        assert!(!present.satisfied);
    }

    #[test]
    fn test_tacacs_servers() {
        let config = cfg(
            "tacacs-server host 10.1.1.5\ntacacs-server host tac.example.com key 7 0822\ntacacs-server host 10.1.1.300\n",
        );
        let result = tacacs_servers(&config).unwrap();
        assert_eq!(result.achieved, 5);
        assert_eq!(result.evidence, vec!["10.1.1.5", "tac.example.com"]);

        assert_eq!(tacacs_servers(&cfg("hostname r1\n")).unwrap().achieved, 0);
    }

    #[test]
    fn test_radius_servers() {
        let result = radius_servers(&cfg("radius server ISE1\n address ipv4 10.0.0.9\n")).unwrap();
        assert_eq!(result.achieved, 2);
        assert_eq!(result.evidence, vec!["ISE1"]);
    }

    #[test]
    fn test_tacacs_source_interface() {
        let result =
            tacacs_source_interface(&cfg("ip tacacs source-interface Loopback0\n")).unwrap();
        assert_eq!(result.achieved, 2);
        assert_eq!(result.evidence, vec!["Loopback0"]);
        assert_eq!(tacacs_source_interface(&cfg("")).unwrap().achieved, 0);
    }

    #[test]
    fn test_radius_source_interface_group_overrides_global() {
        let config = cfg("\
ip radius source-interface Vlan1
aaa group server radius A
 ip radius source-interface Loopback0
aaa group server radius B
 ip radius source-interface Loopback1
");
        let result = radius_source_interface(&config).unwrap();
        assert_eq!(result.achieved, 1);
        assert_eq!(result.evidence, vec!["Loopback1"]);

        let global_only =
            radius_source_interface(&cfg("ip radius source-interface Vlan1\n")).unwrap();
        assert_eq!(global_only.evidence, vec!["Vlan1"]);

        assert!(!radius_source_interface(&cfg("")).unwrap().satisfied);
    }

    #[test]
    fn test_method_chains() {
        let config = cfg("\
aaa authentication login default group tacacs+ local
aaa authentication login CONSOLE local
aaa authentication enable default group radius enable
aaa authorization exec VTY group tacacs+ if-authenticated
");
        let login = authentication_login(&config).unwrap();
        assert_eq!(login.achieved, 3);
        assert_eq!(login.evidence, vec!["default", "group tacacs+", "local"]);

        let enable = authentication_enable(&config).unwrap();
        assert_eq!(enable.evidence, vec!["default", "group radius"]);

        let exec = authorization_exec(&config).unwrap();
        assert!(exec.satisfied);
        assert_eq!(exec.evidence, vec!["group tacacs+"]);

        assert_eq!(authentication_login(&cfg("")).unwrap().achieved, 0);
    }

    #[test]
    fn test_extract_methods_ignores_named_groups() {
        let methods = extract_methods("default group ISE local none", CHAIN_METHODS);
        assert_eq!(methods, vec![AuthMethod::Default, AuthMethod::Local]);
    }

    #[test]
    fn test_vty_overwrite_semantics() {
        let config = cfg("\
line vty 0 4
 login authentication VTY
line vty 5 15
 transport input none
");
        let audit = vty_login_authentication(&config).unwrap();
        assert_eq!(audit.result.achieved, 2);
        assert_eq!(audit.result.evidence, vec!["VTY", "default", "default"]);
        assert!(audit.by_range[0].configured);
        assert!(!audit.by_range[1].configured);

        // A configured range replaces the defaults collected before it
        let late = cfg("line vty 16 31\n login authentication REMOTE\n");
        let audit = vty_login_authentication(&late).unwrap();
        assert_eq!(audit.result.evidence, vec!["REMOTE"]);
        assert_eq!(audit.by_range[0].methods, vec!["default"]);
        assert_eq!(audit.by_range[2].methods, vec!["REMOTE"]);
    }

    #[test]
    fn test_vty_unconfigured() {
        let audit = vty_login_authentication(&cfg("line vty 0 15\n transport input ssh\n")).unwrap();
        assert!(!audit.result.satisfied);
        assert_eq!(audit.result.achieved, 0);
        assert_eq!(audit.result.evidence, vec!["default", "default", "default"]);
    }

    #[test]
    fn test_command_authorization() {
        let config = cfg("\
aaa authorization commands 1 default group tacacs+ local
aaa authorization commands 15 default group tacacs+ none
");
        let audit = command_authorization(&config).unwrap();
        assert_eq!(audit.result.achieved, 5);
        assert_eq!(audit.priv1, vec!["default", "group tacacs+", "local"]);
        assert_eq!(audit.priv15, vec!["default", "group tacacs+", "none"]);
        assert!(audit.priv1_present() && audit.priv15_present());

        let level1 = command_authorization(&cfg(
            "aaa authorization commands 1 default group tacacs+ local\n",
        ))
        .unwrap();
        assert_eq!(level1.result.achieved, 3);
        assert!(level1.result.satisfied);
        assert!(!level1.priv15_present());

        let absent = command_authorization(&cfg("")).unwrap();
        assert_eq!(absent.result.achieved, 0);
        assert!(!absent.result.satisfied);
    }

    #[test]
    fn test_command_authorization_last_statement_per_level_wins() {
        let audit = command_authorization(&cfg("\
aaa authorization commands 1 default local
aaa authorization commands 15 default none
aaa authorization commands 7 default group tacacs+
aaa authorization commands 15 group tacacs+ none
"))
        .unwrap();
        assert_eq!(audit.rules.len(), 4);
        assert_eq!(audit.priv1, vec!["default", "group tacacs+"]);
        assert_eq!(audit.priv15, vec!["group tacacs+", "none"]);
        assert_eq!(audit.result.evidence.len(), 4);
        assert_eq!(audit.result.achieved, 5);
    }

    #[test]
    fn test_max_fail_thresholds() {
        let score = |text: &str| max_fail(&cfg(text)).unwrap().achieved;
        assert_eq!(score(""), 0);
        assert_eq!(score("aaa local authentication attempts max-fail 3\n"), 2);
        assert_eq!(score("aaa local authentication attempts max-fail 1\n"), 2);
        assert_eq!(score("aaa local authentication attempts max-fail 5\n"), 0);
    }

    #[test]
    fn test_auditors_are_idempotent() {
        let config = cfg("\
username a secret x
aaa authorization commands 15 default group tacacs+ none
line vty 0 4
 login authentication VTY
");
        assert_eq!(local_users(&config).unwrap(), local_users(&config).unwrap());
        assert_eq!(
            command_authorization(&config).unwrap(),
            command_authorization(&config).unwrap()
        );
        assert_eq!(
            vty_login_authentication(&config).unwrap(),
            vty_login_authentication(&config).unwrap()
        );
    }
}
