//! Page names derived from an import-relative path.
//!
//! `Namespace/Prefix/sub/dir/base.slot.model` becomes
//! `Namespace:Prefix/SubDirBase`: the first directory is the namespace, the
//! second an optional title prefix, and every deeper directory plus the base
//! name are joined and camel-cased into the local name.

/// Camel-case a name: `-`, `_` and spaces separate words, each word gets an
/// upper-case first letter and separators are dropped. The rest of each word
/// is left alone.
pub fn camel_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Page name for a file named `filename` in directory `relative_dir`
/// (segments separated by `/`, empty for the import root).
pub fn derive_page_name(relative_dir: &str, filename: &str) -> String {
    let base_name = filename.split('.').next().unwrap_or_default();

    let mut dirs = relative_dir.split('/').filter(|s| !s.is_empty());
    let namespace = dirs.next().unwrap_or_default();
    let prefix = dirs.next();

    let segments: Vec<&str> = dirs.chain(std::iter::once(base_name)).collect();
    let local_name = camel_case(&segments.join("-"));

    match prefix {
        Some(prefix) => format!("{}:{}/{}", namespace, prefix, local_name),
        None => format!("{}:{}", namespace, local_name),
    }
}

/// Key a file is known by in the reference mapping: its import-relative path.
pub fn mapping_key(relative_dir: &str, filename: &str) -> String {
    if relative_dir.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", relative_dir, filename)
    }
}
