use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Mesh file formats the service can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MeshFormat {
    #[serde(rename = "obj")]
    Obj,
    #[serde(rename = "stl")]
    Stl,
    #[serde(rename = "3mf")]
    ThreeMf,
}

impl MeshFormat {
    /// Every downloadable format, in the order clients are offered them.
    pub const ALL: [MeshFormat; 3] = [MeshFormat::Obj, MeshFormat::Stl, MeshFormat::ThreeMf];

    /// Format the registry stores artifacts in.
    pub const CANONICAL: MeshFormat = MeshFormat::Obj;

    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "obj",
            MeshFormat::Stl => "stl",
            MeshFormat::ThreeMf => "3mf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "model/obj",
            MeshFormat::Stl => "model/stl",
            MeshFormat::ThreeMf => "model/3mf",
        }
    }

    /// Extensions of every supported format as an English list, e.g. `obj, stl, or 3mf`.
    pub fn supported_list() -> String {
        let extensions: Vec<&str> = Self::ALL.iter().map(|f| f.extension()).collect();
        match extensions.split_last() {
            Some((last, rest)) if !rest.is_empty() => {
                format!("{}, or {}", rest.join(", "), last)
            }
            _ => extensions.concat(),
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported format '{0}'")]
pub struct UnsupportedFormat(pub String);

impl FromStr for MeshFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "obj" => Ok(MeshFormat::Obj),
            "stl" => Ok(MeshFormat::Stl),
            "3mf" => Ok(MeshFormat::ThreeMf),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("OBJ".parse::<MeshFormat>().unwrap(), MeshFormat::Obj);
        assert_eq!(" stl ".parse::<MeshFormat>().unwrap(), MeshFormat::Stl);
        assert_eq!("3MF".parse::<MeshFormat>().unwrap(), MeshFormat::ThreeMf);
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = "fbx".parse::<MeshFormat>().unwrap_err();
        assert_eq!(err, UnsupportedFormat("fbx".to_string()));
    }

    #[test]
    fn supported_list_names_every_format() {
        assert_eq!(MeshFormat::supported_list(), "obj, stl, or 3mf");
    }

    #[test]
    fn serializes_as_extension() {
        let json = serde_json::to_string(&MeshFormat::ALL).unwrap();
        assert_eq!(json, r#"["obj","stl","3mf"]"#);
    }
}
