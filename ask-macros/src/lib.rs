mod ast;
mod emit;
mod parse;

/// Implements `ask::Load` for a struct with named fields.
///
/// Fields are declared with `#[ask("<declaration>", ...)]`; see the `ask`
/// crate docs for the accepted keys.
#[cfg(not(test))]
#[proc_macro_derive(Load, attributes(ask))]
pub fn derive_load(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let text = match parse::parse(ts) {
        Ok(load) => emit::emit(&load),
        Err(err) => emit::error(&err.to_string()),
    };
    text.parse().unwrap()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    match parse::parse(ts) {
        Ok(load) => emit::emit(&load),
        Err(err) => emit::error(&err.to_string()),
    }
}
