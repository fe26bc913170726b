use anyhow::{bail, Context, Result};
use gqlforge_codegen::{generate, GenerateOptions};
use gqlforge_core::SchemaTypeGraph;
use std::path::PathBuf;

const SCHEMA: &str = "schema.graphql";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed={}", SCHEMA);

    let text = std::fs::read_to_string(SCHEMA).with_context(|| format!("reading {}", SCHEMA))?;
    let graph = SchemaTypeGraph::parse(&text);
    let generated =
        generate(&graph, &GenerateOptions::default()).context("formatting generated code")?;
    if !generated.report.is_empty() {
        bail!("{} did not generate cleanly:\n{}", SCHEMA, generated.report);
    }

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR is not set")?);
    for (name, source) in &generated.files {
        let path = out_dir.join(name);
        std::fs::write(&path, source).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
