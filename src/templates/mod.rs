use crate::command::CommandFailure;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldTemplate {
    pub id: &'static str,
    pub description: &'static str,
    pub files: &'static [ScaffoldFile],
}

pub const DEFAULT_TEMPLATE_ID: &str = "basic";

const README: ScaffoldFile = ScaffoldFile {
    path: "README.md",
    body: "# {{named}}\n\n{{description}}\n",
};

const GITIGNORE: ScaffoldFile = ScaffoldFile {
    path: ".gitignore",
    body: "/target\n",
};

pub const TEMPLATES: &[ScaffoldTemplate] = &[
    ScaffoldTemplate {
        id: "basic",
        description: "Binary project with a hello-world entry point",
        files: &[
            README,
            GITIGNORE,
            ScaffoldFile {
                path: "Cargo.toml",
                body: "# generated by {{generator}}\n[package]\nname = \"{{named}}\"\nversion = \"{{version}}\"\nedition = \"2021\"\n",
            },
            ScaffoldFile {
                path: "src/main.rs",
                body: "fn main() {\n    println!(\"Hello from {{named}}!\");\n}\n",
            },
        ],
    },
    ScaffoldTemplate {
        id: "library",
        description: "Library crate with a unit test module",
        files: &[
            README,
            GITIGNORE,
            ScaffoldFile {
                path: "Cargo.toml",
                body: "# generated by {{generator}}\n[package]\nname = \"{{named}}\"\nversion = \"{{version}}\"\nedition = \"2021\"\n\n[lib]\ndoctest = false\n",
            },
            ScaffoldFile {
                path: "src/lib.rs",
                body: "pub fn name() -> &'static str {\n    \"{{named}}\"\n}\n\n#[cfg(test)]\nmod tests {\n    #[test]\n    fn reports_name() {\n        assert_eq!(super::name(), \"{{named}}\");\n    }\n}\n",
            },
        ],
    },
    ScaffoldTemplate {
        id: "service",
        description: "Long-running service with a YAML config file",
        files: &[
            README,
            GITIGNORE,
            ScaffoldFile {
                path: "Cargo.toml",
                body: "# generated by {{generator}}\n[package]\nname = \"{{named}}\"\nversion = \"{{version}}\"\nedition = \"2021\"\n\n[dependencies]\nserde = { version = \"1\", features = [\"derive\"] }\nserde_yaml = \"0.9\"\n",
            },
            ScaffoldFile {
                path: "config.yaml",
                body: "name: {{named}}\nlisten: 127.0.0.1:8080\n",
            },
            ScaffoldFile {
                path: "src/main.rs",
                body: "fn main() {\n    println!(\"{{named}} {{version}} starting\");\n}\n",
            },
        ],
    },
];

pub fn find_template(id: &str) -> Option<&'static ScaffoldTemplate> {
    TEMPLATES.iter().find(|template| template.id == id)
}

pub fn template_ids() -> Vec<&'static str> {
    TEMPLATES.iter().map(|template| template.id).collect()
}

/// Replaces `{{token}}` placeholders from `values`.
pub fn render_placeholders(
    template: &str,
    values: &BTreeMap<&str, String>,
) -> Result<String, String> {
    let mut rendered = String::new();
    let mut cursor = template;

    while let Some(start) = cursor.find("{{") {
        rendered.push_str(&cursor[..start]);
        let after_open = &cursor[start + 2..];
        let Some(close_offset) = after_open.find("}}") else {
            return Err("unclosed placeholder in template".to_string());
        };
        let token = after_open[..close_offset].trim();
        let value = values
            .get(token)
            .ok_or_else(|| format!("unsupported placeholder `{{{{{token}}}}}`"))?;
        rendered.push_str(value);
        cursor = &after_open[close_offset + 2..];
    }

    rendered.push_str(cursor);
    Ok(rendered)
}

/// Writes every template file under `root`, returning the relative paths
/// in template order.
pub fn write_scaffold(
    template: &ScaffoldTemplate,
    root: &Path,
    values: &BTreeMap<&str, String>,
) -> Result<Vec<PathBuf>, CommandFailure> {
    let mut written = Vec::with_capacity(template.files.len());
    for file in template.files {
        let body = render_placeholders(file.body, values).map_err(|reason| {
            CommandFailure::new(format!(
                "template `{}` file `{}`: {reason}",
                template.id, file.path
            ))
        })?;
        let target = root.join(file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, body)?;
        written.push(PathBuf::from(file.path));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn values() -> BTreeMap<&'static str, String> {
        BTreeMap::from_iter([
            ("named", "demo".to_string()),
            ("description", "A demo".to_string()),
            ("version", "0.1.0".to_string()),
            ("generator", "cmdhost".to_string()),
        ])
    }

    #[test]
    fn render_rejects_unknown_placeholders() {
        let err = render_placeholders("{{ nope }}", &values()).unwrap_err();
        assert_eq!(err, "unsupported placeholder `{{nope}}`");
    }

    #[test]
    fn every_template_renders_with_standard_values() {
        for template in TEMPLATES {
            for file in template.files {
                render_placeholders(file.body, &values()).expect("renders");
            }
        }
    }

    #[test]
    fn write_scaffold_creates_nested_files() {
        let dir = tempdir().expect("tempdir");
        let template = find_template("library").expect("library template");
        let written = write_scaffold(template, dir.path(), &values()).expect("write");
        assert_eq!(written.len(), 4);
        let lib = fs::read_to_string(dir.path().join("src/lib.rs")).expect("lib.rs");
        assert!(lib.contains("\"demo\""));
    }
}
