#[derive(Debug)]
pub(crate) struct Load {
    pub(crate) name: String,
    pub(crate) doc: Option<String>,
    pub(crate) caps: Caps,
    pub(crate) fields: Vec<Field>,
}

/// Capability traits the struct implements itself.
#[derive(Debug, Default)]
pub(crate) struct Caps {
    pub(crate) command: bool,
    pub(crate) route: bool,
    pub(crate) help: bool,
    pub(crate) init_default: bool,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) ident: String,
    pub(crate) binding: Binding,
}

#[derive(Debug)]
pub(crate) enum Binding {
    /// Goes through the registry.
    Field(Tags),
    /// The field is its own `ask::Value`.
    Value(Tags),
    Group(Tags),
    Changed(String),
}

#[derive(Debug, Default)]
pub(crate) struct Tags {
    pub(crate) decl: String,
    pub(crate) help: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) deprecated: Option<String>,
    pub(crate) default: Option<String>,
}

impl Load {
    /// Groups declared with `.`, whose capabilities are looked up after
    /// the struct's own.
    pub(crate) fn inlined(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|it| match &it.binding {
            Binding::Group(tags) => tags.decl.trim() == ".",
            _ => false,
        })
    }
}
