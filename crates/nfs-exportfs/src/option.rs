//! Export options and their `-o` string encoding
//!
//! Every option is the same shape: a keyword, zero or more values and an
//! omission rule. The catalog below is a set of constants for the bare
//! flags and constructor functions for the parameterised ones.

use std::fmt;
use std::str::FromStr;

use crate::error::{ExportfsError, Result};

/// Characters that delimit options, keywords and values in `-o`.
const SEPARATORS: &[char] = &[',', ':', '='];

/// A single exportfs option such as `no_root_squash` or `fsid=7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportOption {
    keyword: &'static str,
    values: Vec<String>,
    omit_when_empty: bool,
}

impl ExportOption {
    /// Creates a bare flag carrying only its keyword.
    pub const fn flag(keyword: &'static str) -> Self {
        Self {
            keyword,
            values: Vec::new(),
            omit_when_empty: false,
        }
    }

    fn with_values(keyword: &'static str, values: Vec<String>, omit_when_empty: bool) -> Self {
        Self {
            keyword,
            values,
            omit_when_empty,
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// True when the option disappears entirely once its values are blank.
    pub fn omit_when_empty(&self) -> bool {
        self.omit_when_empty
    }

    fn joined_values(&self) -> String {
        self.values
            .iter()
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Rejects values containing `,`, `:` or `=`, which would split the
    /// option or smuggle another one into the list.
    pub fn validate(&self) -> Result<()> {
        match self.values.iter().find(|v| v.contains(SEPARATORS)) {
            Some(value) => Err(ExportfsError::InvalidOption {
                option: format!("{}={}", self.keyword, value),
                reason: "value must not contain ',', ':' or '='".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Encodes the option as `keyword` or `keyword=v1:v2`.
    ///
    /// Returns an empty string when the option should be dropped from the
    /// option list altogether. Values are not checked; see [`validate`].
    ///
    /// [`validate`]: Self::validate
    pub fn render(&self) -> String {
        let values = self.joined_values();
        if values.is_empty() {
            if self.omit_when_empty {
                return String::new();
            }
            return self.keyword.to_string();
        }
        format!("{}={}", self.keyword, values)
    }
}

impl fmt::Display for ExportOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Joins options with commas, skipping any that render empty.
///
/// Fails if any option carries a value with a separator in it.
pub fn join_options(options: &[ExportOption]) -> Result<String> {
    let mut rendered = Vec::with_capacity(options.len());
    for option in options {
        option.validate()?;
        let text = option.render();
        if !text.is_empty() {
            rendered.push(text);
        }
    }
    Ok(rendered.join(","))
}

macro_rules! export_flags {
    ($($(#[$meta:meta])* $name:ident => $keyword:literal,)+) => {
        $(
            $(#[$meta])*
            pub const $name: ExportOption = ExportOption::flag($keyword);
        )+

        const FLAG_KEYWORDS: &[&str] = &[$($keyword),+];
    };
}

export_flags! {
    /// Require requests from a reserved port (below 1024). On by default.
    SECURE => "secure",
    /// Accept requests from any source port.
    INSECURE => "insecure",
    /// Allow both read and write requests.
    RW => "rw",
    /// Allow only read requests. The default.
    RO => "ro",
    /// Reply before changes reach stable storage. Faster, but an unclean
    /// server restart can lose or corrupt data.
    ASYNC => "async",
    /// Reply only after changes are committed to stable storage.
    SYNC => "sync",
    /// Commit writes immediately instead of batching related ones. No
    /// effect together with `ASYNC`.
    NO_WDELAY => "no_wdelay",
    /// Delay related writes so they can be committed together. The default.
    WDELAY => "wdelay",
    /// Let clients cross into filesystems mounted below this export.
    NO_HIDE => "nohide",
    HIDE => "hide",
    /// Implicitly export every filesystem mounted below this one.
    CROSS_MNT => "crossmnt",
    NO_CROSS_MNT => "nocrossmnt",
    /// Skip checking that accessed files lie inside the exported subtree.
    NO_SUBTREE_CHECK => "no_subtree_check",
    SUBTREE_CHECK => "subtree_check",
    /// Do not require credentials on NLM lock requests.
    INSECURE_LOCKS => "insecure_locks",
    /// Synonym of `INSECURE_LOCKS`.
    NO_AUTH_NLM => "no_auth_nlm",
    SECURE_LOCKS => "secure_locks",
    /// Synonym of `SECURE_LOCKS`.
    AUTH_NLM => "auth_nlm",
    /// Answer READDIRPLUS with NFS3ERR_NOTSUPP. NFSv3 only.
    NO_RDIRPLUS => "nordirplus",
    /// Enable pNFS layouts when the filesystem and protocol allow it.
    PNFS => "pnfs",
    NO_PNFS => "no_pnfs",
    /// Map uid/gid 0 to the anonymous ids.
    ROOT_SQUASH => "root_squash",
    /// Leave remote root unmapped. Mainly for diskless clients.
    NO_ROOT_SQUASH => "no_root_squash",
    /// Map every uid and gid to the anonymous ids.
    ALL_SQUASH => "all_squash",
    NO_ALL_SQUASH => "no_all_squash",
}

/// Export only if the export point (or `path`, when given) is a mount point.
pub fn mount_point(path: &str) -> ExportOption {
    mount_point_as("mountpoint", path)
}

/// Short spelling of [`mount_point`].
pub fn mp(path: &str) -> ExportOption {
    mount_point_as("mp", path)
}

fn mount_point_as(keyword: &'static str, path: &str) -> ExportOption {
    let values = if path.is_empty() {
        Vec::new()
    } else {
        vec![path.to_string()]
    };
    ExportOption::with_values(keyword, values, false)
}

/// Identifies the exported filesystem, e.g. `0`, `root` or a UUID.
pub fn fs_id(id: &str) -> ExportOption {
    ExportOption::with_values("fsid", vec![id.to_string()], false)
}

/// Alternative locations a client referencing this export is sent to.
/// Omitted entirely when every location is blank.
pub fn refer<I, S>(locations: I) -> ExportOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExportOption::with_values("refer", locations.into_iter().map(Into::into).collect(), true)
}

/// Replica locations offered to clients asking for alternatives.
/// Omitted entirely when every replica is blank.
pub fn replicas<I, S>(replicas: I) -> ExportOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExportOption::with_values("replicas", replicas.into_iter().map(Into::into).collect(), true)
}

pub fn anon_uid(uid: u32) -> ExportOption {
    ExportOption::with_values("anonuid", vec![uid.to_string()], false)
}

pub fn anon_gid(gid: u32) -> ExportOption {
    ExportOption::with_values("anongid", vec![gid.to_string()], false)
}

impl FromStr for ExportOption {
    type Err = ExportfsError;

    /// Parses `keyword` or `keyword=v1:v2` against the catalog.
    fn from_str(s: &str) -> Result<Self> {
        let option = parse_option(s)?;
        option.validate()?;
        Ok(option)
    }
}

fn parse_option(s: &str) -> Result<ExportOption> {
    let text = s.trim();
    let (keyword, value) = match text.split_once('=') {
        Some((k, v)) => (k.trim(), Some(v.trim())),
        None => (text, None),
    };
    let invalid = |reason: &str| ExportfsError::InvalidOption {
        option: text.to_string(),
        reason: reason.to_string(),
    };

    match keyword {
        "mountpoint" => Ok(mount_point(value.unwrap_or(""))),
        "mp" => Ok(mp(value.unwrap_or(""))),
        "fsid" => match value {
            Some(id) if !id.is_empty() => Ok(fs_id(id)),
            _ => Err(invalid("fsid requires a value")),
        },
        "refer" => Ok(refer(value.unwrap_or("").split(':'))),
        "replicas" => Ok(replicas(value.unwrap_or("").split(':'))),
        "anonuid" | "anongid" => {
            let id = value
                .ok_or_else(|| invalid("requires a numeric id"))?
                .parse::<u32>()
                .map_err(|e| invalid(&e.to_string()))?;
            if keyword == "anonuid" {
                Ok(anon_uid(id))
            } else {
                Ok(anon_gid(id))
            }
        }
        other => {
            let flag = FLAG_KEYWORDS
                .iter()
                .find(|k| **k == other)
                .ok_or_else(|| ExportfsError::UnknownOption {
                    keyword: other.to_string(),
                })?;
            if value.is_some() {
                return Err(invalid("flag does not take a value"));
            }
            Ok(ExportOption::flag(*flag))
        }
    }
}

/// Parses a comma separated option list such as `rw,fsid=1,no_root_squash`.
pub fn parse_options(list: &str) -> Result<Vec<ExportOption>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
