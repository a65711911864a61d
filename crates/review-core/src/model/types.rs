//! Normalized, read-only view of one build's results

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::build_id::BuildId;
use super::outcome::Outcome;
use super::raw::{RawBuild, RawId, RawModule, RawNeedle};
use crate::bail_malformed;
use crate::error::Result;

/// Reference to a needle used while a module failed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeedleRef {
    pub name: String,
    pub tags: BTreeSet<String>,
}

impl NeedleRef {
    pub fn new<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NeedleRef {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// One named step of a build's run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestModule {
    pub name: String,
    pub outcome: Outcome,
    /// Needles referenced by the failure, in reported order
    pub needles: Vec<NeedleRef>,
    /// Revision of the test code that produced this result
    pub source_revision: Option<String>,
    pub failure_reason: Option<String>,
}

impl TestModule {
    pub fn needle(&self, name: &str) -> Option<&NeedleRef> {
        self.needles.iter().find(|n| n.name == name)
    }

    pub fn needle_names(&self) -> BTreeSet<&str> {
        self.needles.iter().map(|n| n.name.as_str()).collect()
    }
}

/// Identity of a build variant: which job group, flavor, architecture and build
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildKey {
    pub job_group: String,
    pub flavor: Option<String>,
    pub arch: String,
    pub id: BuildId,
}

impl BuildKey {
    pub fn new(
        job_group: impl Into<String>,
        flavor: Option<String>,
        arch: impl Into<String>,
        id: impl Into<BuildId>,
    ) -> Self {
        BuildKey {
            job_group: job_group.into(),
            flavor,
            arch: arch.into(),
            id: id.into(),
        }
    }

    /// Architecture, qualified by flavor when one is set
    pub fn variant(&self) -> String {
        match &self.flavor {
            Some(flavor) => format!("{}-{}", flavor, self.arch),
            None => self.arch.clone(),
        }
    }

    /// Same job group, flavor and architecture; build id may differ
    pub fn same_variant(&self, other: &BuildKey) -> bool {
        self.job_group == other.job_group && self.flavor == other.flavor && self.arch == other.arch
    }

    /// Key for another build of the same variant
    pub fn with_id(&self, id: BuildId) -> BuildKey {
        BuildKey { id, ..self.clone() }
    }
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.job_group, self.id, self.variant())
    }
}

/// A build's results, materialized and validated
///
/// Immutable after [`Build::load`]; comparisons only ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    key: BuildKey,
    timestamp: Option<DateTime<Utc>>,
    ancestors: Vec<BuildId>,
    modules: Vec<TestModule>,
    by_name: HashMap<String, usize>,
}

fn required(value: Option<&str>, source: &str, what: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => bail_malformed!(source, format!("missing {}", what)),
    }
}

fn load_needle(raw: &RawNeedle, source: &str, module: &str) -> Result<NeedleRef> {
    let name = required(
        raw.name.as_deref(),
        source,
        &format!("needle name in module '{}'", module),
    )?;
    Ok(NeedleRef::new(name, raw.tags.iter().cloned()))
}

fn load_module(raw: &RawModule, source: &str, position: usize) -> Result<TestModule> {
    let name = required(
        raw.name.as_deref(),
        source,
        &format!("module name (module #{})", position + 1),
    )?;
    let outcome_text = required(
        raw.outcome.as_deref(),
        source,
        &format!("outcome of module '{}'", name),
    )?;
    let outcome = match outcome_text.parse::<Outcome>() {
        Ok(outcome) => outcome,
        Err(_) => bail_malformed!(
            source,
            format!("unknown outcome '{}' for module '{}'", outcome_text, name)
        ),
    };
    let needles = raw
        .needles
        .iter()
        .map(|n| load_needle(n, source, &name))
        .collect::<Result<Vec<_>>>()?;

    Ok(TestModule {
        name,
        outcome,
        needles,
        source_revision: raw
            .source_revision
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        failure_reason: raw.failure_reason.clone(),
    })
}

impl Build {
    /// Validate and normalize a raw record
    ///
    /// `source` names where the record came from and only shows up in errors.
    pub fn load(source: &str, raw: &RawBuild) -> Result<Build> {
        let id = required(
            raw.id.as_ref().map(RawId::to_string).as_deref(),
            source,
            "build id",
        )?;
        let job_group = required(raw.job_group.as_deref(), source, "job group")?;
        let arch = required(raw.arch.as_deref(), source, "architecture")?;
        let flavor = raw
            .flavor
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let key = BuildKey::new(job_group, flavor, arch, BuildId::new(id));
        if key.id.is_empty() {
            bail_malformed!(source, "missing build id");
        }

        let mut modules = Vec::with_capacity(raw.modules.len());
        let mut by_name = HashMap::with_capacity(raw.modules.len());
        for (position, raw_module) in raw.modules.iter().enumerate() {
            let module = load_module(raw_module, source, position)?;
            if by_name.insert(module.name.clone(), modules.len()).is_some() {
                bail_malformed!(source, format!("duplicate module '{}'", module.name));
            }
            modules.push(module);
        }

        let ancestors = raw
            .ancestors
            .iter()
            .map(|a| BuildId::new(a.to_string()))
            .filter(|a| !a.is_empty())
            .collect();

        Ok(Build {
            key,
            timestamp: raw.timestamp,
            ancestors,
            modules,
            by_name,
        })
    }

    pub fn key(&self) -> &BuildKey {
        &self.key
    }

    pub fn id(&self) -> &BuildId {
        &self.key.id
    }

    pub fn variant(&self) -> String {
        self.key.variant()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Explicit predecessors, nearest first
    pub fn ancestors(&self) -> &[BuildId] {
        &self.ancestors
    }

    /// Modules in the build's reported test order
    pub fn modules(&self) -> &[TestModule] {
        &self.modules
    }

    /// Look up a module; absence is a normal outcome between builds
    pub fn module_by_name(&self, name: &str) -> Option<&TestModule> {
        self.by_name.get(name).map(|&idx| &self.modules[idx])
    }

    /// Every source revision seen in this build
    pub fn source_revisions(&self) -> BTreeSet<&str> {
        self.modules
            .iter()
            .filter_map(|m| m.source_revision.as_deref())
            .collect()
    }

    /// Every needle referenced anywhere in this build, by name
    pub fn needle_catalog(&self) -> BTreeMap<&str, &NeedleRef> {
        self.modules
            .iter()
            .flat_map(|m| m.needles.iter())
            .map(|n| (n.name.as_str(), n))
            .collect()
    }

    pub fn outcome_counts(&self) -> BTreeMap<Outcome, usize> {
        let mut counts: BTreeMap<Outcome, usize> = Outcome::ALL.iter().map(|o| (*o, 0)).collect();
        for module in &self.modules {
            *counts.entry(module.outcome).or_default() += 1;
        }
        counts
    }

    /// Convert back into the raw record form, e.g. for caching
    pub fn to_raw(&self) -> RawBuild {
        RawBuild {
            id: Some(RawId::Text(self.key.id.to_string())),
            job_group: Some(self.key.job_group.clone()),
            flavor: self.key.flavor.clone(),
            arch: Some(self.key.arch.clone()),
            timestamp: self.timestamp,
            ancestors: self
                .ancestors
                .iter()
                .map(|a| RawId::Text(a.to_string()))
                .collect(),
            modules: self
                .modules
                .iter()
                .map(|m| RawModule {
                    name: Some(m.name.clone()),
                    outcome: Some(m.outcome.as_str().to_string()),
                    needles: m
                        .needles
                        .iter()
                        .map(|n| RawNeedle {
                            name: Some(n.name.clone()),
                            tags: n.tags.iter().cloned().collect(),
                        })
                        .collect(),
                    source_revision: m.source_revision.clone(),
                    failure_reason: m.failure_reason.clone(),
                })
                .collect(),
        }
    }
}
