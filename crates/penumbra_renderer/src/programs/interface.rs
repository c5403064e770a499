//! Finds the `in` / `uniform` variables a GLSL source declares at global scope.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    In,
    Uniform,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceVar {
    pub qualifier: Qualifier,
    pub ty: String,
    pub name: String,
    pub array_len: Option<usize>,
}

impl InterfaceVar {
    /// Names the driver reports for this variable: one per array element.
    pub fn binding_names(&self) -> Vec<String> {
        match self.array_len {
            Some(len) => (0..len).map(|i| format!("{}[{i}]", self.name)).collect(),
            None => vec![self.name.clone()],
        }
    }
}

/// Declarations inside function bodies, parameter lists and uniform blocks
/// are ignored, as are comments and preprocessor lines.
pub fn discover_interface(source: &str) -> Vec<InterfaceVar> {
    let mut vars = Vec::new();
    for statement in global_statements(&strip_comments(source)) {
        parse_declaration(&statement, &mut vars);
    }
    vars
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn global_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in source.chars() {
        match c {
            '{' => {
                // whatever preceded it was a function or block header
                if depth == 0 {
                    current.clear();
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => statements.push(std::mem::take(&mut current)),
            _ if depth == 0 => current.push(c),
            _ => {}
        }
    }
    statements
}

fn tokenize(statement: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in statement.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_declaration(statement: &str, vars: &mut Vec<InterfaceVar>) {
    let tokens = tokenize(statement);

    // drop layout(...) qualifiers, they may contain anything
    let mut cleaned = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        if token == "layout" {
            for t in iter.by_ref() {
                if t == ")" {
                    break;
                }
            }
            continue;
        }
        cleaned.push(token);
    }

    // function prototypes carry their qualifiers inside the parameter list
    if cleaned.iter().any(|t| t == "(") {
        return;
    }
    let Some(qualifier_at) = cleaned.iter().position(|t| t == "in" || t == "uniform") else {
        return;
    };
    let qualifier = if cleaned[qualifier_at] == "in" {
        Qualifier::In
    } else {
        Qualifier::Uniform
    };

    let mut rest = cleaned[qualifier_at + 1..]
        .iter()
        .skip_while(|t| matches!(t.as_str(), "lowp" | "mediump" | "highp"));
    let Some(ty) = rest.next().filter(|t| is_identifier(t)) else {
        return;
    };
    let declarators: Vec<&String> = rest.collect();

    for declarator in declarators.split(|t| t.as_str() == ",") {
        let Some(name) = declarator.first().filter(|t| is_identifier(t)) else {
            continue;
        };
        let array_len = match declarator.get(1).map(|t| t.as_str()) {
            Some("[") => declarator.get(2).and_then(|n| n.parse::<usize>().ok()),
            _ => None,
        };
        vars.push(InterfaceVar {
            qualifier,
            ty: ty.clone(),
            name: name.to_string(),
            array_len,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(source: &str) -> Vec<String> {
        discover_interface(source)
            .into_iter()
            .map(|v| v.name)
            .collect()
    }

    #[test]
    fn finds_comma_separated_declarators() {
        let vars = discover_interface("in vec4 a_position, a_normal, a_color;");
        assert_eq!(vars.len(), 3);
        assert!(vars.iter().all(|v| v.qualifier == Qualifier::In && v.ty == "vec4"));
        assert_eq!(vars[2].name, "a_color");
    }

    #[test]
    fn array_suffix_is_recorded_and_expanded() {
        let vars = discover_interface("uniform vec4 u_light_position[5];\nuniform sampler2D u_texture [9];");
        assert_eq!(vars[0].array_len, Some(5));
        assert_eq!(vars[1].array_len, Some(9));
        let names = vars[0].binding_names();
        assert_eq!(names.first().map(String::as_str), Some("u_light_position[0]"));
        assert_eq!(names.last().map(String::as_str), Some("u_light_position[4]"));
    }

    #[test]
    fn precision_and_layout_qualifiers_are_skipped() {
        let vars = discover_interface(
            "layout(location = 0) in highp vec4 a_position;\nuniform mediump float u_ambient_light;",
        );
        assert_eq!(vars[0].name, "a_position");
        assert_eq!(vars[0].ty, "vec4");
        assert_eq!(vars[1].ty, "float");
    }

    #[test]
    fn ignores_comments_preprocessor_and_function_scope() {
        let source = r#"
#version 300 es
precision highp float;
// uniform float u_commented;
/* in vec4 a_block_comment; */
uniform int u_kept;
out vec4 out_color;
float helper(in float x) { return x; }
void main() {
  float uniform_like = 1.0;
}
"#;
        assert_eq!(names(source), vec!["u_kept".to_string()]);
    }

    #[test]
    fn prototypes_do_not_declare_interface_variables() {
        let source = "float helper(in float x);\nvec4 shade(in vec3 n, uniform_like y);\nin vec4 a_color;";
        assert_eq!(names(source), vec!["a_color".to_string()]);
    }

    #[test]
    fn uniform_blocks_are_not_interface_variables() {
        let source = "uniform Globals { vec4 u_inside; } globals;\nuniform float u_after;";
        assert_eq!(names(source), vec!["u_after".to_string()]);
    }

    #[test]
    fn non_literal_array_size_keeps_bare_name() {
        let vars = discover_interface("uniform vec4 u_lights[LIGHT_COUNT];");
        assert_eq!(vars[0].array_len, None);
        assert_eq!(vars[0].binding_names(), vec!["u_lights".to_string()]);
    }
}
