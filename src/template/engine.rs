use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::{Map, Value};

use super::error::{Result, TemplateError};

/// Id of the page skeleton every module renders into.
pub const MAIN_TEMPLATE: &str = "main";
/// File holding the page skeleton and its footer.
pub const MAIN_TEMPLATE_FILE: &str = "main.tpl.html";

/// Named templates loaded from files, each with its own data.
///
/// A template file may hold several templates, each wrapped in
/// `<!--%tpl_<id>-->` and `<!--%%tpl_<id>-->` markers. Registering an id from
/// such a file keeps only the matching section; a file without markers for the
/// id is used whole.
pub struct TemplateEngine {
    dir: PathBuf,
    registry: Handlebars<'static>,
    data: HashMap<String, Map<String, Value>>,
}

impl TemplateEngine {
    /// Create an engine rooted at `dir` with the main layout registered.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let mut registry = Handlebars::new();
        // Placeholders without data render as empty strings.
        registry.set_strict_mode(false);

        let mut engine = Self {
            dir: dir.into(),
            registry,
            data: HashMap::new(),
        };
        engine.new_template(MAIN_TEMPLATE, MAIN_TEMPLATE_FILE)?;
        Ok(engine)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Register template `id` from `file` (relative to the template
    /// directory). Does nothing if `id` is already registered.
    pub fn new_template(&mut self, id: &str, file: impl AsRef<Path>) -> Result<()> {
        if self.has_template(id) {
            return Ok(());
        }

        let path = self.dir.join(file.as_ref());
        let content = std::fs::read_to_string(&path).map_err(|source| TemplateError::File {
            id: id.to_string(),
            path: path.clone(),
            source,
        })?;

        let source = extract_section(&content, id).unwrap_or(&content);
        self.register(id, source)?;
        tracing::debug!(id, path = %path.display(), "Registered template");
        Ok(())
    }

    /// Register template `id` from an in-memory source.
    pub fn register(&mut self, id: &str, source: &str) -> Result<()> {
        self.registry
            .register_template_string(id, source)
            .map_err(|e| TemplateError::Syntax {
                id: id.to_string(),
                source: Box::new(e),
            })
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.registry.has_template(id)
    }

    /// Merge key/value pairs into the data of template `id`. Later values for
    /// the same key replace earlier ones.
    pub fn add_template_data<I, K, V>(&mut self, id: &str, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entry = self.data.entry(id.to_string()).or_default();
        for (k, v) in data {
            entry.insert(k.into(), v.into());
        }
    }

    /// Data currently attached to template `id`.
    pub fn template_data(&self, id: &str) -> Option<&Map<String, Value>> {
        self.data.get(id)
    }

    /// Render template `id` with its data.
    pub fn get_template(&self, id: &str) -> Result<String> {
        self.ensure_registered(id)?;
        Ok(self.registry.render(id, &self.context(id))?)
    }

    /// Render template `id` straight into `out`.
    pub fn display<W: Write>(&self, id: &str, out: W) -> Result<()> {
        self.ensure_registered(id)?;
        self.registry.render_to_write(id, &self.context(id), out)?;
        Ok(())
    }

    fn ensure_registered(&self, id: &str) -> Result<()> {
        if self.has_template(id) {
            Ok(())
        } else {
            Err(TemplateError::NotFound(id.to_string()))
        }
    }

    fn context(&self, id: &str) -> Value {
        Value::Object(self.data.get(id).cloned().unwrap_or_default())
    }
}

/// Returns the body of the `<!--%tpl_<id>-->` section in `content`, if any.
pub fn extract_section<'a>(content: &'a str, id: &str) -> Option<&'a str> {
    let open = format!("<!--%tpl_{}-->", id);
    let close = format!("<!--%%tpl_{}-->", id);

    let start = content.find(&open)? + open.len();
    let len = content[start..].find(&close)?;
    Some(&content[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "<!--%tpl_main--><main>{{{content}}}</main>{{{html_footer}}}<!--%%tpl_main-->\n\
                          <!--%tpl_main_footer--><footer>bottom</footer><!--%%tpl_main_footer-->";

    fn engine_with_layout() -> (tempfile::TempDir, TemplateEngine) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MAIN_TEMPLATE_FILE), LAYOUT).unwrap();
        let engine = TemplateEngine::new(dir.path()).unwrap();
        (dir, engine)
    }

    #[test]
    fn test_extract_section() {
        assert_eq!(
            extract_section(LAYOUT, "main_footer"),
            Some("<footer>bottom</footer>")
        );
        assert_eq!(
            extract_section(LAYOUT, "main"),
            Some("<main>{{{content}}}</main>{{{html_footer}}}")
        );
        assert_eq!(extract_section(LAYOUT, "sidebar"), None);
    }

    #[test]
    fn test_unclosed_section_is_ignored() {
        assert_eq!(extract_section("<!--%tpl_x-->open", "x"), None);
    }

    #[test]
    fn test_new_registers_main() {
        let (_dir, engine) = engine_with_layout();
        assert!(engine.has_template(MAIN_TEMPLATE));
        assert_eq!(engine.get_template("main").unwrap(), "<main></main>");
    }

    #[test]
    fn test_new_fails_without_layout() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TemplateEngine::new(dir.path()),
            Err(TemplateError::File { .. })
        ));
    }

    #[test]
    fn test_data_is_merged_and_overwritten() {
        let (_dir, mut engine) = engine_with_layout();
        engine.add_template_data("main", [("content", "one")]);
        engine.add_template_data("main", [("content", "two"), ("html_footer", "<hr>")]);

        assert_eq!(engine.get_template("main").unwrap(), "<main>two</main><hr>");
    }

    #[test]
    fn test_escaped_placeholders() {
        let (_dir, mut engine) = engine_with_layout();
        engine.register("label", "<b>{{name}}</b>").unwrap();
        engine.add_template_data("label", [("name", "<script>")]);

        assert_eq!(engine.get_template("label").unwrap(), "<b>&lt;script&gt;</b>");
    }

    #[test]
    fn test_registering_twice_keeps_first() {
        let (dir, mut engine) = engine_with_layout();
        std::fs::write(dir.path().join("other.tpl.html"), "other").unwrap();

        engine.new_template("main", "other.tpl.html").unwrap();
        assert_eq!(engine.get_template("main").unwrap(), "<main></main>");
    }

    #[test]
    fn test_unknown_template() {
        let (_dir, engine) = engine_with_layout();
        assert!(matches!(
            engine.get_template("missing"),
            Err(TemplateError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_display_writes_rendered_output() {
        let (_dir, mut engine) = engine_with_layout();
        engine.new_template("main_footer", MAIN_TEMPLATE_FILE).unwrap();

        let mut out = Vec::new();
        engine.display("main_footer", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<footer>bottom</footer>");
    }
}
