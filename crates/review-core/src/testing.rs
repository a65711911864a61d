//! Builders for unit tests

use crate::model::{Build, RawBuild, RawId, RawModule, RawNeedle};

pub const GROUP: &str = "openSUSE Tumbleweed";

pub fn module(name: &str, outcome: &str) -> RawModule {
    RawModule {
        name: Some(name.to_string()),
        outcome: Some(outcome.to_string()),
        source_revision: Some("rev-1".to_string()),
        ..Default::default()
    }
}

pub fn with_revision(mut module: RawModule, revision: &str) -> RawModule {
    module.source_revision = Some(revision.to_string());
    module
}

pub fn with_needles(mut module: RawModule, needles: &[(&str, &[&str])]) -> RawModule {
    module.needles = needles
        .iter()
        .map(|(name, tags)| RawNeedle {
            name: Some(name.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect();
    module
}

pub fn raw(id: &str, arch: &str, modules: Vec<RawModule>) -> RawBuild {
    RawBuild {
        id: Some(RawId::Text(id.to_string())),
        job_group: Some(GROUP.to_string()),
        arch: Some(arch.to_string()),
        modules,
        ..Default::default()
    }
}

pub fn build(id: &str, arch: &str, modules: Vec<RawModule>) -> Build {
    Build::load("test", &raw(id, arch, modules)).expect("valid test build")
}
