//! Demonstration of declarative flag definition.
//!
//! Declares a small example configuration, defines it from the process's
//! command-line arguments, and prints the resolved values — as a bordered
//! block by default, or as JSON with `--json`. Run with `--help` to see
//! the generated flag surface.

use flagconf_core::{Config, ConfigSpec, FieldType};

fn example_spec() -> ConfigSpec {
    ConfigSpec::new("flagconf-demo")
        .describe("Demonstration of declarative flag definition")
        .field("a", 3)
        .field("b", false)
        .field("h", true)
        .field("c", ("spam", "field with value and doc string"))
        .field(
            "ddd",
            (None::<i64>, FieldType::Int, "field with type and doc string"),
        )
        .field("json", (false, "print the resolved configuration as JSON"))
}

fn main() {
    let config = match example_spec().define() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = print_config(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn print_config(config: &Config) -> Result<(), String> {
    if config.get_bool("json").unwrap_or(false) {
        let json = config.snapshot().to_json();
        let pretty = serde_json::to_string_pretty(&json)
            .map_err(|err| format!("failed to serialize configuration: {err}"))?;
        println!("{pretty}");
    } else {
        config
            .print(Some("example configuration"))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::example_spec;

    #[test]
    fn test_example_spec_defines_with_defaults() {
        let config = example_spec().define_from(Vec::<&str>::new()).unwrap();
        assert_eq!(config.get_int("a"), Some(3));
        assert_eq!(config.get_bool("b"), Some(false));
        assert_eq!(config.get_bool("h"), Some(true));
        assert_eq!(config.get_str("c"), Some("spam"));
        assert_eq!(config.get("ddd"), None);
    }

    #[test]
    fn test_example_spec_accepts_flags() {
        let config = example_spec()
            .define_from(["-a", "7", "--b", "--no-h", "--ddd", "42"])
            .unwrap();
        assert_eq!(config.get_int("a"), Some(7));
        assert_eq!(config.get_bool("b"), Some(true));
        assert_eq!(config.get_bool("h"), Some(false));
        assert_eq!(config.get_int("ddd"), Some(42));
    }
}
