//! Pretty-printing of resolved configurations.

use crate::define::Config;
use crate::error::ConfigurationError;

/// Layout of a rendered block: the number of `- ` segments in the border
/// lines and the string prepended to every content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStyle {
    pub block_size: usize,
    pub prefix: String,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            block_size: 39,
            prefix: "|  ".to_string(),
        }
    }
}

/// Renders every resolved field as a `name : value` line inside a bordered
/// block, names left-padded to the longest field name. An optional title
/// line appears under the top border. The configuration must be defined.
///
/// ```text
/// + - - - - - - - - - - - - - - - - - - -
/// |  demo
/// |  count : 5
/// |  v     : true
/// + - - - - - - - - - - - - - - - - - - -
/// ```
pub fn render(config: &Config, title: Option<&str>) -> crate::Result<String> {
    render_with(config, title, &BlockStyle::default())
}

/// Like [`render`], with an explicit [`BlockStyle`].
pub fn render_with(
    config: &Config,
    title: Option<&str>,
    style: &BlockStyle,
) -> crate::Result<String> {
    if !config.is_defined() {
        return Err(ConfigurationError::NotDefined);
    }
    let width = config.names().map(str::len).max().unwrap_or(0);
    let border = format!("+ {}", "- ".repeat(style.block_size).trim_end());
    let prefix = style.prefix.as_str();

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    if let Some(title) = title {
        out.push_str(prefix);
        out.push_str(title);
        out.push('\n');
    }
    for (name, value) in config.entries() {
        let rendered = match value {
            Some(value) => value.to_string(),
            None => "none".to_string(),
        };
        out.push_str(&format!("{prefix}{name:<width$} : {rendered}\n"));
    }
    out.push_str(&border);
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::{ConfigSpec, ConfigurationError, Field};

    fn defined_config() -> crate::Config {
        ConfigSpec::new("demo")
            .field("count", 5)
            .field("verbose", false)
            .field("t", Field::int(None))
            .define_from(Vec::<&str>::new())
            .unwrap()
    }

    #[test]
    fn test_render_includes_every_field_name() {
        let rendered = defined_config().render(None).unwrap();
        for name in ["count", "verbose", "t"] {
            assert!(rendered.contains(name), "missing {name} in:\n{rendered}");
        }
    }

    #[test]
    fn test_render_pads_names_to_the_longest() {
        let rendered = defined_config().render(None).unwrap();
        assert!(rendered.contains("|  count   : 5"));
        assert!(rendered.contains("|  verbose : false"));
        assert!(rendered.contains("|  t       : none"));
    }

    #[test]
    fn test_render_title_and_borders() {
        let rendered = defined_config().render(Some("demo config")).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines.first().unwrap().starts_with("+ - -"));
        assert_eq!(lines[1], "|  demo config");
        assert!(lines.last().unwrap().starts_with("+ - -"));
    }

    #[test]
    fn test_render_with_custom_style() {
        let style = super::BlockStyle {
            block_size: 4,
            prefix: "> ".to_string(),
        };
        let rendered = defined_config()
            .render_with(Some("demo config"), &style)
            .unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.first().unwrap(), &"+ - - - -");
        assert_eq!(lines[1], "> demo config");
        assert!(lines[2].starts_with("> count"));
        assert_eq!(lines.last().unwrap(), &"+ - - - -");
    }

    #[test]
    fn test_render_requires_definition() {
        let config = crate::Config::new(ConfigSpec::new("demo").field("a", 1));
        assert_eq!(
            config.render(None).unwrap_err(),
            ConfigurationError::NotDefined
        );
    }
}
