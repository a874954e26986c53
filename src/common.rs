use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(filename: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| !v.is_null());
    handlebars.register_helper("exists", Box::new(exists));

    handlebars
}
