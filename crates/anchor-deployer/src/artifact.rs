//! Resolves contract factories from Hardhat compilation artifacts.
//!
//! Hardhat writes one JSON file per compiled contract to
//! `artifacts/<source path>/<ContractName>.json`, next to a `.dbg.json` file
//! and a shared `build-info` directory that are not of interest here.

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    anyhow::{Context, Result, bail, ensure},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs,
        path::{Component, Path, PathBuf},
    },
};

const BUILD_INFO_DIR: &str = "build-info";

/// Everything needed to create a new instance of a contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    pub name: String,
    /// Source file the contract was compiled from, e.g.
    /// `contracts/KERIAnchor.sol`.
    pub source: String,
    /// Creation code, sent as the input of the deployment transaction.
    pub bytecode: Bytes,
    pub abi: JsonAbi,
}

impl ContractFactory {
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.source, self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    // Kept as a string, unlinked bytecode contains placeholders that are not
    // valid hex.
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, serde_json::Value>,
}

/// A directory of compilation artifacts.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads the factory for `name`, which is either a bare contract name or
    /// a fully qualified `source:name`.
    pub fn factory(&self, name: &str) -> Result<ContractFactory> {
        let path = self.locate(name)?;
        tracing::debug!(path = %path.display(), "loading artifact");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let artifact: Artifact = serde_json::from_str(&contents)
            .with_context(|| format!("malformed artifact {}", path.display()))?;

        let expected = name.rsplit_once(':').map_or(name, |(_, name)| name);
        ensure!(
            artifact.contract_name == expected,
            "artifact {} describes {} instead of {expected}",
            path.display(),
            artifact.contract_name,
        );
        artifact.into_factory()
    }

    fn locate(&self, name: &str) -> Result<PathBuf> {
        if let Some((source, name)) = name.rsplit_once(':') {
            let path = self.root.join(source).join(format!("{name}.json"));
            ensure!(
                path.is_file(),
                "artifact for {source}:{name} not found at {}",
                path.display()
            );
            return Ok(path);
        }

        ensure!(
            self.root.is_dir(),
            "artifacts directory {} does not exist, compile the contracts first",
            self.root.display()
        );
        let mut matches = Vec::new();
        find(&self.root, &format!("{name}.json"), &mut matches)?;
        matches.sort();
        match matches.len() {
            0 => bail!(
                "artifact for {name} not found in {}",
                self.root.display()
            ),
            1 => Ok(matches.remove(0)),
            _ => {
                let candidates = matches
                    .iter()
                    .map(|path| self.qualified_name(path, name))
                    .collect::<Vec<_>>();
                bail!(
                    "there are multiple artifacts for {name}, use one of the fully qualified \
                     names: {}",
                    candidates.join(", ")
                )
            }
        }
    }

    fn qualified_name(&self, path: &Path, name: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .map(|dir| {
                dir.components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => Some(part.to_string_lossy()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        format!("{source}:{name}")
    }
}

fn find(dir: &Path, file_name: &str, matches: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() != BUILD_INFO_DIR {
                find(&path, file_name, matches)?;
            }
        } else if entry.file_name() == file_name {
            matches.push(path);
        }
    }
    Ok(())
}

impl Artifact {
    fn into_factory(self) -> Result<ContractFactory> {
        let qualified = format!("{}:{}", self.source_name, self.contract_name);
        ensure!(
            self.link_references.is_empty(),
            "{qualified} needs the libraries {} linked before it can be deployed",
            self.link_references
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        let bytecode: Bytes = self
            .bytecode
            .parse()
            .with_context(|| format!("{qualified} has malformed bytecode"))?;
        ensure!(
            !bytecode.is_empty(),
            "{qualified} has no bytecode, it is abstract or an interface"
        );
        if let Some(constructor) = self.abi.constructor() {
            ensure!(
                constructor.inputs.is_empty(),
                "{qualified} expects {} constructor arguments, none can be given",
                constructor.inputs.len()
            );
        }

        Ok(ContractFactory {
            name: self.contract_name,
            source: self.source_name,
            bytecode,
            abi: self.abi,
        })
    }
}
