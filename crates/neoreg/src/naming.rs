//! Naming conventions: exported identifiers, derived service names, and the
//! dotted `Service.Method` address format.

/// Separator between the service and method parts of a dotted name.
pub const SEPARATOR: char = '.';

/// Returns true if `name` starts with an upper-case character.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Smart pointers whose pointee names the service.
const POINTERS: &[&str] = &["Box", "Arc", "Rc"];

/// Derives a service name from a Rust type name.
///
/// Drops references, pointer wrappers, generic arguments and the module path,
/// so `alloc::boxed::Box<my_app::calc::Calc<u64>>` becomes `Calc`.
pub fn short_type_name(full: &str) -> &str {
    let mut name = strip_refs(full);
    loop {
        let (base, generics) = match name.find('<') {
            Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
            None => (name, None),
        };
        let last = match base.rfind("::") {
            Some(idx) => &base[idx + 2..],
            None => base,
        };
        match generics {
            Some(args) if POINTERS.contains(&last) => name = strip_refs(first_arg(args)),
            _ => return last,
        }
    }
}

fn strip_refs(mut name: &str) -> &str {
    loop {
        name = name.trim_start();
        if let Some(rest) = name.strip_prefix('&') {
            name = rest;
        } else if let Some(rest) = name.strip_prefix("mut ") {
            name = rest;
        } else {
            return name;
        }
    }
}

/// The first generic argument of `args`, which is everything after a `<`.
fn first_arg(args: &str) -> &str {
    let mut depth = 0usize;
    for (idx, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if depth == 0 => return &args[..idx],
            '>' => depth -= 1,
            ',' if depth == 0 => return &args[..idx],
            _ => {}
        }
    }
    args
}

/// Splits a dotted name into exactly two non-empty parts.
pub fn split_dotted(dotted: &str) -> Option<(&str, &str)> {
    let mut parts = dotted.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(service), Some(method), None) if !service.is_empty() && !method.is_empty() => {
            Some((service, method))
        }
        _ => None,
    }
}
