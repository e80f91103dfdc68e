// src/codegen.rs

use anyhow::{Context, Result};
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{info, instrument, warn};

use crate::vendor::{ShapedRecord, VendorSchema};

/// Namespace the generated definitions live in.
pub const NAMESPACE: &str = "anyblob::cloud";

const RULE: &str = "//---------------------------------------------------------------------------\n";

/// License block written between the first two rules of every generated file.
pub const PREAMBLE: &str = "\
// AnyBlob - Universal Cloud Object Storage Library
// Dominik Durner, 2023
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
// SPDX-License-Identifier: MPL-2.0
";

/// One record as a brace initializer: `{ "m5.large", 8.0, 2, 10000 }`.
pub fn record_literal(r: &ShapedRecord) -> String {
    format!("{{ {}, {:?}, {}, {} }}", r.name, r.memory, r.vcpu, r.network)
}

/// The full source file defining `<Vendor>Instance::getInstanceDetails()`.
pub fn render(vendor: &str, records: &[ShapedRecord]) -> String {
    let ty = format!("{}Instance", vendor);
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "#include \"cloud/{}_instances.hpp\"", vendor.to_lowercase());
    out.push_str(RULE);
    out.push_str(PREAMBLE);
    out.push_str(RULE);
    let _ = writeln!(out, "namespace {} {{", NAMESPACE);
    out.push_str(RULE);
    out.push_str("using namespace std;\n");
    out.push_str(RULE);
    let _ = writeln!(out, "vector<{ty}> {ty}::getInstanceDetails()");
    out.push_str("// Gets a vector of instance type infos\n");
    out.push_str("{\n");
    let _ = writeln!(out, "    vector<{ty}> instances =");

    if records.is_empty() {
        out.push_str("{};\n");
    } else {
        out.push_str("{\n");
        let body: Vec<String> = records.iter().map(record_literal).collect();
        out.push_str(&body.join(",\n"));
        out.push_str(" };\n");
    }

    out.push_str("return instances;\n");
    out.push_str("}\n");
    out.push_str(RULE);
    let _ = writeln!(out, "}} // namespace {}", NAMESPACE);
    out
}

/// Output path for a vendor inside `out_dir`.
pub fn output_path(out_dir: &Path, vendor: &str) -> PathBuf {
    out_dir.join(format!("{}_instances.cpp", vendor.to_lowercase()))
}

/// Shape `<input_dir>/<vendor>.csv` and write the generated source file.
/// Returns the written path and the number of records.
#[instrument(level = "info", skip_all, fields(vendor = %schema.vendor))]
pub fn generate_vendor(
    schema: &VendorSchema,
    input_dir: &Path,
    out_dir: &Path,
) -> Result<(PathBuf, usize)> {
    let input = input_dir.join(format!("{}.csv", schema.vendor.to_lowercase()));
    let records = schema.shape_csv(&input)?;
    let path = output_path(out_dir, &schema.vendor);
    fs::write(&path, render(&schema.vendor, &records))
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "generated");
    Ok((path, records.len()))
}

/// Run `clang-format -i` over a generated file. A missing formatter is
/// logged, not fatal.
pub fn clang_format(path: &Path) {
    match Command::new("clang-format").arg("-i").arg(path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => warn!(path = %path.display(), status = %s, "clang-format failed"),
        Err(e) => warn!(path = %path.display(), error = %e, "clang-format not run"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, memory: f64, vcpu: u64, network: u64) -> ShapedRecord {
        ShapedRecord {
            name: format!("\"{}\"", name),
            memory,
            vcpu,
            network,
        }
    }

    #[test]
    fn literal_field_order_and_types() {
        assert_eq!(
            record_literal(&rec("m5.large", 8.0, 2, 10000)),
            r#"{ "m5.large", 8.0, 2, 10000 }"#
        );
        assert_eq!(
            record_literal(&rec("t4g.nano", 0.5, 2, 5000)),
            r#"{ "t4g.nano", 0.5, 2, 5000 }"#
        );
    }

    #[test]
    fn renders_array_and_boilerplate() {
        let src = render("AWS", &[rec("a", 1.0, 1, 1000), rec("b", 2.0, 2, 2000)]);
        assert!(src.starts_with("#include \"cloud/aws_instances.hpp\"\n"));
        assert!(src.contains(&format!("{RULE}// AnyBlob - Universal Cloud Object Storage Library\n")));
        assert!(src.contains(&format!("// SPDX-License-Identifier: MPL-2.0\n{RULE}namespace anyblob::cloud {{\n")));
        assert!(src.contains("namespace anyblob::cloud {\n"));
        assert!(src.contains("vector<AWSInstance> AWSInstance::getInstanceDetails()\n"));
        assert!(src.contains("{\n{ \"a\", 1.0, 1, 1000 },\n{ \"b\", 2.0, 2, 2000 } };\n"));
        assert!(src.ends_with("} // namespace anyblob::cloud\n"));
    }

    #[test]
    fn empty_array_still_compiles() {
        let src = render("GCP", &[]);
        assert!(src.contains("vector<GCPInstance> instances =\n{};\nreturn instances;"));
    }

    #[test]
    fn generates_file_from_csv() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("azure.csv"),
            "Size,vC,Memory,Network Bandwidth\nStandard_D2_v5,2,8,12500\n",
        )?;
        let (path, n) = generate_vendor(&VendorSchema::azure(), dir.path(), dir.path())?;
        assert_eq!(n, 1);
        assert_eq!(path, dir.path().join("azure_instances.cpp"));
        let src = fs::read_to_string(&path)?;
        assert!(src.contains(r#"{ "Standard_D2_v5", 8.0, 2, 12500 } };"#));
        Ok(())
    }
}
