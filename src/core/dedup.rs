use std::collections::HashMap;

/// Makes repeated names distinguishable.
///
/// The first occurrence of a name is kept as is; the n-th occurrence of the
/// same string becomes `"name (n)"`. Output has the same length and order as
/// the input.
pub fn dedupe<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.to_string()
            } else {
                format!("{} ({})", name, count)
            }
        })
        .collect()
}
