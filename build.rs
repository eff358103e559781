use std::collections::HashSet;

use serde_json::Value;

const CATALOGUE: &str = "catalogs/expected_genes.json";

/// Check the embedded catalogue: a version string, and per genus a map of
/// known schemes to non-empty lists of distinct gene names. Returns the
/// number of genera and of genes.
fn check(catalogue: &Value) -> Result<(usize, usize), String> {
    if catalogue.get("version").and_then(Value::as_str).is_none() {
        return Err("missing string field 'version'".to_string());
    }
    let genera = catalogue
        .get("genera")
        .and_then(Value::as_object)
        .ok_or("missing 'genera' object")?;

    let mut genes_total = 0;
    for (genus, schemes) in genera {
        let schemes = schemes
            .as_object()
            .ok_or_else(|| format!("{genus}: expected a map of schemes"))?;
        for (scheme, genes) in schemes {
            if !matches!(scheme.as_str(), "mlst" | "rmlst" | "cgmlst") {
                return Err(format!("{genus}: unknown scheme '{scheme}'"));
            }
            let genes = genes
                .as_array()
                .filter(|genes| !genes.is_empty())
                .ok_or_else(|| format!("{genus}/{scheme}: expected a non-empty gene list"))?;
            let mut seen = HashSet::new();
            for gene in genes {
                match gene.as_str() {
                    Some(name) if seen.insert(name) => {}
                    Some(name) => return Err(format!("{genus}/{scheme}: '{name}' listed twice")),
                    None => return Err(format!("{genus}/{scheme}: non-string gene {gene}")),
                }
            }
            genes_total += genes.len();
        }
    }
    Ok((genera.len(), genes_total))
}

fn main() {
    println!("cargo:rerun-if-changed={CATALOGUE}");
    println!("cargo:rerun-if-changed=build.rs");

    let result = std::fs::read_to_string(CATALOGUE)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()))
        .and_then(|catalogue| check(&catalogue));

    match result {
        Ok((genera, genes)) => {
            println!("cargo:warning=Validated catalogue: {genera} genera, {genes} expected genes");
        }
        Err(e) => panic!("invalid catalogue {CATALOGUE}: {e}"),
    }
}
