use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    hex,
    json_abi::JsonAbi,
    primitives::Bytes,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{config::PathsConfig, errors::ScriptError};

/// A compiled contract, as written in the artifacts directory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Name of the contract
    pub contract_name: String,
    /// Source file, relative to the project root
    pub source_name: String,
    /// Contract ABI
    pub abi: JsonAbi,
    /// Hex encoded creation bytecode
    pub bytecode: String,
    /// Where the artifact was read from
    #[serde(skip)]
    pub path: PathBuf,
}

/// Compiler input and version of a build
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Short solc version, e.g. `0.8.20`
    pub solc_version: String,
    /// Full solc version, e.g. `0.8.20+commit.a1b79de6`
    pub solc_long_version: String,
    /// Standard json input given to the compiler
    pub input: Value,
}

/// Debug file written next to each artifact
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    /// Build info path, relative to the debug file directory
    build_info: String,
}

impl ContractArtifact {
    /// `<source>:<contract>` name, as expected by explorers
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// ABI encode the constructor arguments, coercing each one to its parameter type
    pub fn encode_constructor_args(&self, args: &[String]) -> Result<Vec<u8>, ScriptError> {
        let Some(constructor) = self.abi.constructor.as_ref() else {
            if args.is_empty() {
                return Ok(Vec::new());
            }
            return Err(ScriptError::Artifact(format!(
                "{} has no constructor but {} argument(s) were given",
                self.contract_name,
                args.len()
            )));
        };

        if constructor.inputs.len() != args.len() {
            return Err(ScriptError::Artifact(format!(
                "{} constructor expects {} argument(s), got {}",
                self.contract_name,
                constructor.inputs.len(),
                args.len()
            )));
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty = param
                    .resolve()
                    .map_err(|e| ScriptError::Artifact(e.to_string()))?;
                ty.coerce_str(arg).map_err(|e| {
                    ScriptError::Artifact(format!(
                        "argument {:?} is not a valid {}: {e}",
                        arg, param.ty
                    ))
                })
            })
            .collect::<Result<Vec<DynSolValue>, ScriptError>>()?;

        constructor
            .abi_encode_input(&values)
            .map_err(|e| ScriptError::Artifact(e.to_string()))
    }

    /// Creation bytecode followed by the encoded constructor arguments
    pub fn deploy_code(&self, args: &[String]) -> Result<Bytes, ScriptError> {
        let mut code = hex::decode(&self.bytecode).map_err(|e| {
            ScriptError::Artifact(format!("invalid bytecode for {}: {e}", self.contract_name))
        })?;
        if code.is_empty() {
            return Err(ScriptError::Artifact(format!(
                "{} has no bytecode, is it abstract or an interface?",
                self.contract_name
            )));
        }

        code.extend(self.encode_constructor_args(args)?);
        Ok(code.into())
    }
}

/// Reads compiled artifacts from the project layout
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: PathsConfig,
}

impl ArtifactStore {
    /// Build a store over the given layout
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    /// Load a contract artifact, by plain name (`Token`) or fully qualified
    /// name (`contracts/Token.sol:Token`)
    pub fn load(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        let path = self.locate(name)?;
        let mut artifact: ContractArtifact = read_json(&path)?;
        artifact.path = path;

        Ok(artifact)
    }

    /// Load the build info the artifact was compiled from
    pub fn build_info(&self, artifact: &ContractArtifact) -> Result<BuildInfo, ScriptError> {
        let debug_path = artifact.path.with_extension("dbg.json");
        let debug: DebugFile = read_json(&debug_path)?;

        let base = debug_path.parent().unwrap_or_else(|| Path::new("."));
        read_json(&base.join(debug.build_info))
    }

    /// Find the artifact file of a contract
    fn locate(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if let Some((source, contract)) = name.split_once(':') {
            let path = self
                .paths
                .artifacts
                .join(source)
                .join(format!("{contract}.json"));
            if !path.is_file() {
                return Err(ScriptError::Artifact(format!(
                    "no artifact for {name} at {}",
                    path.display()
                )));
            }
            return Ok(path);
        }

        let root = self.paths.source_artifacts();
        let mut found = Vec::new();
        find_files(&root, &format!("{name}.json"), &mut found)?;

        match found.len() {
            0 => Err(ScriptError::Artifact(format!(
                "no artifact for {name} under {}, were the contracts compiled?",
                root.display()
            ))),
            1 => Ok(found.remove(0)),
            _ => Err(ScriptError::Artifact(format!(
                "{name} is ambiguous, use a fully qualified name: {}",
                found
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Recursively collect the files named `file_name` under `dir`
fn find_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::Artifact(format!("{}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect::<Vec<_>>();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            find_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|f| f == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

/// Parses the JSON file at the given path
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::Artifact(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::Artifact(format!("{}: {e}", path.display())))
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    /// Write a Token artifact, its debug file and its build info under `root`
    pub(crate) fn write_token_artifacts(root: &Path) -> PathsConfig {
        let paths = PathsConfig {
            artifacts: root.join("artifacts"),
            ..PathsConfig::default()
        };

        let artifact_dir = paths.artifacts.join("contracts/Token.sol");
        fs::create_dir_all(&artifact_dir).unwrap();
        fs::create_dir_all(paths.build_info()).unwrap();

        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": "Token",
            "sourceName": "contracts/Token.sol",
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    { "name": "name_", "type": "string", "internalType": "string" },
                    { "name": "symbol_", "type": "string", "internalType": "string" }
                ]
            }],
            "bytecode": "0x6080604052",
            "deployedBytecode": "0x6080",
            "linkReferences": {},
            "deployedLinkReferences": {}
        });
        fs::write(artifact_dir.join("Token.json"), artifact.to_string()).unwrap();
        fs::write(
            artifact_dir.join("Token.dbg.json"),
            json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc123.json" })
                .to_string(),
        )
        .unwrap();

        let build_info = json!({
            "id": "abc123",
            "solcVersion": "0.8.20",
            "solcLongVersion": "0.8.20+commit.a1b79de6",
            "input": {
                "language": "Solidity",
                "sources": { "contracts/Token.sol": { "content": "contract Token {}" } },
                "settings": { "optimizer": { "enabled": true, "runs": 200 } }
            },
            "output": {}
        });
        fs::write(paths.build_info().join("abc123.json"), build_info.to_string()).unwrap();

        paths
    }

    fn sample_args() -> Vec<String> {
        vec!["NameToken".to_string(), "SymbolToken".to_string()]
    }

    #[test]
    fn load_by_plain_name() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));

        let artifact = store.load("Token").unwrap();
        assert_eq!(artifact.contract_name, "Token");
        assert_eq!(artifact.fully_qualified_name(), "contracts/Token.sol:Token");
    }

    #[test]
    fn load_by_fully_qualified_name() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));

        let artifact = store.load("contracts/Token.sol:Token").unwrap();
        assert!(artifact.path.ends_with("contracts/Token.sol/Token.json"));
    }

    #[test]
    fn missing_artifact_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));

        assert!(matches!(store.load("Vault"), Err(ScriptError::Artifact(_))));
        assert!(matches!(
            store.load("contracts/Vault.sol:Vault"),
            Err(ScriptError::Artifact(_))
        ));
    }

    #[test]
    fn duplicated_names_are_ambiguous() {
        let dir = TempDir::new().unwrap();
        let paths = write_token_artifacts(dir.path());
        let other = paths.artifacts.join("contracts/mocks/Token.sol");
        fs::create_dir_all(&other).unwrap();
        fs::copy(
            paths.artifacts.join("contracts/Token.sol/Token.json"),
            other.join("Token.json"),
        )
        .unwrap();

        let err = ArtifactStore::new(paths).load("Token").unwrap_err();
        match err {
            ScriptError::Artifact(msg) => assert!(msg.contains("ambiguous")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn build_info_follows_debug_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));
        let artifact = store.load("Token").unwrap();

        let build_info = store.build_info(&artifact).unwrap();
        assert_eq!(build_info.solc_version, "0.8.20");
        assert_eq!(build_info.solc_long_version, "0.8.20+commit.a1b79de6");
        assert_eq!(build_info.input["language"], "Solidity");
    }

    #[test]
    fn constructor_args_are_abi_encoded_in_order() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));
        let artifact = store.load("Token").unwrap();

        let encoded = artifact.encode_constructor_args(&sample_args()).unwrap();
        // two offsets, then each string as length + one padded word
        assert_eq!(encoded.len(), 6 * 32);
        assert_eq!(encoded[31], 0x40);
        assert_eq!(encoded[63], 0x80);
        assert_eq!(encoded[95], 9);
        assert_eq!(&encoded[96..105], b"NameToken");
        assert_eq!(encoded[159], 11);
        assert_eq!(&encoded[160..171], b"SymbolToken");
    }

    #[test]
    fn deploy_code_appends_args_to_bytecode() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));
        let artifact = store.load("Token").unwrap();

        let code = artifact.deploy_code(&sample_args()).unwrap();
        assert_eq!(&code[..5], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(code.len(), 5 + 6 * 32);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));
        let artifact = store.load("Token").unwrap();

        let err = artifact
            .encode_constructor_args(&["OnlyName".to_string()])
            .unwrap_err();
        assert!(matches!(err, ScriptError::Artifact(_)));
    }

    #[test]
    fn empty_bytecode_is_not_deployable() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(write_token_artifacts(dir.path()));
        let mut artifact = store.load("Token").unwrap();
        artifact.bytecode = "0x".to_string();

        assert!(artifact.deploy_code(&sample_args()).is_err());
    }
}
