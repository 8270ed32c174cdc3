use crate::config::{Config, ImportOrder, WrapMode};
use crate::include::unit_identifier;
use crate::ir::IncludeItem;

/// Prepends one import per include item and applies the configured wrapping.
pub fn assemble(body: &str, includes: &[IncludeItem], unit: &str, config: &Config) -> String {
    let mut out = String::new();

    let ordered: Box<dyn Iterator<Item = &IncludeItem>> = match config.import_order {
        ImportOrder::Discovery => Box::new(includes.iter()),
        ImportOrder::Reverse => Box::new(includes.iter().rev()),
    };
    for item in ordered {
        out.push_str(&import_line(item));
    }

    match config.wrap {
        WrapMode::Bare => out.push_str(body),
        WrapMode::Function => {
            out.push_str(&format!(
                "export function {}() {{\n{}\n}}\n",
                unit_identifier(unit),
                body
            ));
        }
    }
    out
}

pub fn import_line(item: &IncludeItem) -> String {
    format!("import {{{}}} from \"{}\"\n", item.name, item.path)
}
