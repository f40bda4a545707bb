use std::fmt::Write;

use crate::ast;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(load: &ast::Load) -> String {
    let mut buf = String::new();

    w!(buf, "impl ::ask::Load for {} {{\n", load.name);
    emit_load(&mut buf, load);
    if load.caps.init_default {
        blank_line(&mut buf);
        w!(buf, "    fn init_default(&mut self) {{\n");
        w!(buf, "        ::ask::InitDefault::init_default(self)\n");
        w!(buf, "    }}\n");
    }
    emit_cap(&mut buf, load, "as_command", "Command", load.caps.command);
    emit_cap(&mut buf, load, "as_route", "Route", load.caps.route);
    emit_help(&mut buf, load);
    w!(buf, "}}\n");

    buf
}

pub(crate) fn error(msg: &str) -> String {
    format!("::core::compile_error!({:?});\n", msg)
}

fn emit_load(buf: &mut String, load: &ast::Load) {
    w!(buf, "    fn load<'a>(\n");
    w!(buf, "        &'a mut self,\n");
    w!(buf, "        loader: &mut ::ask::Loader<'a>,\n");
    w!(buf, "    ) -> ::core::result::Result<(), ::ask::LoadError> {{\n");
    if load.fields.is_empty() {
        w!(buf, "        let _ = loader;\n");
    }
    for field in &load.fields {
        let ident = &field.ident;
        match &field.binding {
            ast::Binding::Field(tags) => {
                w!(buf, "        loader.field(&mut self.{}, {})?;\n", ident, gen_tags(tags))
            }
            ast::Binding::Value(tags) => {
                w!(buf, "        loader.value(&mut self.{}, {})?;\n", ident, gen_tags(tags))
            }
            ast::Binding::Group(tags) => {
                w!(buf, "        loader.group(&mut self.{}, {})?;\n", ident, gen_tags(tags))
            }
            ast::Binding::Changed(path) => {
                w!(buf, "        loader.changed({:?}, &mut self.{});\n", path, ident)
            }
        }
    }
    w!(buf, "        ::core::result::Result::Ok(())\n");
    w!(buf, "    }}\n");
}

fn gen_tags(tags: &ast::Tags) -> String {
    let mut buf = format!("::ask::Tags::new({:?})", tags.decl);
    if let Some(help) = &tags.help {
        w!(buf, ".help({:?})", help);
    }
    if tags.hidden {
        w!(buf, ".hidden()");
    }
    if let Some(reason) = &tags.deprecated {
        w!(buf, ".deprecated({:?})", reason);
    }
    if let Some(default) = &tags.default {
        w!(buf, ".default_value({:?})", default);
    }
    buf
}

/// The struct's own capability wins, then the first inlined group that has
/// one.
fn emit_cap(buf: &mut String, load: &ast::Load, method: &str, trait_: &str, own: bool) {
    let inlined = load.inlined().collect::<Vec<_>>();
    if !own && inlined.is_empty() {
        return;
    }
    blank_line(buf);
    w!(buf, "    fn {}(&mut self) -> ::core::option::Option<&mut dyn ::ask::{}> {{\n", method, trait_);
    if own {
        w!(buf, "        ::core::option::Option::Some(self)\n");
    } else {
        w!(buf, "        ::core::option::Option::None");
        for field in inlined {
            w!(buf, "\n            .or(::ask::Load::{}(&mut self.{}))", method, field.ident);
        }
        w!(buf, "\n");
    }
    w!(buf, "    }}\n");
}

fn emit_help(buf: &mut String, load: &ast::Load) {
    let inlined = load.inlined().collect::<Vec<_>>();
    if !load.caps.help && load.doc.is_none() && inlined.is_empty() {
        return;
    }
    blank_line(buf);
    w!(buf, "    fn as_help(&self) -> ::core::option::Option<&dyn ::ask::Help> {{\n");
    match &load.doc {
        _ if load.caps.help => w!(buf, "        ::core::option::Option::Some(self)\n"),
        Some(doc) => w!(buf, "        ::core::option::Option::Some(&{:?})\n", doc),
        None => {
            w!(buf, "        ::core::option::Option::None");
            for field in inlined {
                w!(buf, "\n            .or(::ask::Load::as_help(&self.{}))", field.ident);
            }
            w!(buf, "\n");
        }
    }
    w!(buf, "    }}\n");
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
