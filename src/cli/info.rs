//! Boxed detail panel for a single extension

use crate::cli::extension::{join_versions, Extension, Relocatable};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Tera, Value};

const INFO_TEMPLATE_NAME: &str = "extension_info";
const INFO_TEMPLATE: &str = include_str!("../../templates/extension_info.tera");

/// Gates the dependency line of the RPM block. It reads the DEB dependency
/// list, not `rpm_deps`: an RPM-only entry never shows its dependencies.
pub fn rpm_dependency_line_visible(ext: &Extension) -> bool {
    !ext.deb_deps.is_empty()
}

pub fn deb_dependency_line_visible(ext: &Extension) -> bool {
    !ext.deb_deps.is_empty()
}

#[derive(Serialize)]
struct InfoView<'a> {
    name: &'a str,
    en_desc: &'a str,
    alias: &'a str,
    category: &'a str,
    version: &'a str,
    license: &'a str,
    url: &'a str,
    summary_url: &'a str,
    pg_ver: String,
    need_ddl: &'static str,
    create_sql: &'a str,
    need_load: &'static str,
    shared_lib: &'a str,
    super_user: &'a str,
    relocatable: &'static str,
    schema: &'a str,
    requires: String,
    need_by: &'a [String],
    rpm_repo: &'a str,
    rpm_pkg: &'a str,
    rpm_ver: &'a str,
    rpm_pg: String,
    rpm_deps: String,
    rpm_deps_visible: bool,
    deb_repo: &'a str,
    deb_pkg: &'a str,
    deb_ver: &'a str,
    deb_pg: String,
    deb_deps: String,
    deb_deps_visible: bool,
    bad_case: &'a [String],
    comment: &'a str,
}

impl<'a> From<&'a Extension> for InfoView<'a> {
    fn from(ext: &'a Extension) -> Self {
        InfoView {
            name: &ext.name,
            en_desc: &ext.en_desc,
            alias: &ext.alias,
            category: &ext.category,
            version: &ext.version,
            license: &ext.license,
            url: &ext.url,
            summary_url: &ext.summary_url,
            pg_ver: ext.pg_ver_str(),
            need_ddl: yes_no(ext.need_ddl),
            create_sql: &ext.create_sql,
            need_load: yes_no(ext.need_load),
            shared_lib: &ext.shared_lib,
            super_user: &ext.super_user,
            relocatable: yes_no(ext.relocatable == Relocatable::Relocatable),
            schema: &ext.schema_str,
            requires: ext.requires.join(", "),
            need_by: &ext.need_by,
            rpm_repo: &ext.rpm_repo,
            rpm_pkg: &ext.rpm_pkg,
            rpm_ver: &ext.rpm_ver,
            rpm_pg: join_versions(&ext.rpm_pg),
            rpm_deps: ext.rpm_deps.join(", "),
            rpm_deps_visible: rpm_dependency_line_visible(ext),
            deb_repo: &ext.deb_repo,
            deb_pkg: &ext.deb_pkg,
            deb_ver: &ext.deb_ver,
            deb_pg: join_versions(&ext.deb_pg),
            deb_deps: ext.deb_deps.join(", "),
            deb_deps_visible: deb_dependency_line_visible(ext),
            bad_case: &ext.bad_case,
            comment: &ext.comment,
        }
    }
}

// flags share a 3 column slot
fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No "
    }
}

/// Pads `text` to exactly `width` chars, cutting it short with `…`
/// when it does not fit.
///
/// Width is counted in `char`s, not terminal columns: double-width text
/// (CJK, most emoji) fits the char budget but overflows the box by one
/// column per wide character.
pub fn fit_width(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        let mut fitted = String::with_capacity(text.len() + width - count);
        fitted.push_str(text);
        fitted.extend(std::iter::repeat(' ').take(width - count));
        return fitted;
    }
    if width == 0 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push('…');
    fitted
}

fn fit_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("fit", "value", String, value);
    let width = match args.get("w") {
        Some(w) => tera::try_get_value!("fit", "w", usize, w),
        None => return Err(tera::Error::msg("filter `fit` expected an arg called `w`")),
    };

    Ok(Value::String(fit_width(&text, width)))
}

pub struct InfoRenderer {
    tera: Tera,
}

impl InfoRenderer {
    pub fn new() -> Result<InfoRenderer, tera::Error> {
        let mut tera = Tera::default();
        tera.register_filter("fit", fit_filter);
        tera.add_raw_template(INFO_TEMPLATE_NAME, INFO_TEMPLATE)?;

        Ok(InfoRenderer { tera })
    }

    pub fn render(&self, ext: &Extension) -> Result<String, tera::Error> {
        let context = tera::Context::from_serialize(InfoView::from(ext))?;
        self.tera.render(INFO_TEMPLATE_NAME, &context)
    }
}
