use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";
const REQUIRED_TABLES: [&str; 3] = ["backend", "render", "auth"];

fn main() {
    // The bundled config is embedded with include_str!, so reject it here
    // rather than at first use.
    println!("cargo:rerun-if-changed={CONFIG_PATH}");

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    for name in REQUIRED_TABLES {
        if !table.contains_key(name) {
            panic!("default_config.toml is missing the [{name}] table");
        }
    }
}
