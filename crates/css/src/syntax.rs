use dom::Selector;

// A single CSS property: "color: red"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

// One selector and its declarations. Comma-separated selector lists are
// flattened into consecutive rules at parse time so rule order stays a flat
// sequence; a bare `*` rule keeps its identity for the resolver's
// universal-selector short-circuit.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn declared(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(property))
            .map(|d| d.value.as_str())
    }
}

// A full stylesheet: ordered rules identified by their origin.
// Rule order is load order; resolution scans it, never reorders it.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub origin: String,
    pub rules: Vec<Rule>,
}

// input: "div, #id { color: red; } .class { font-size: 12px; }"
// output: Stylesheet { rules: vec![Rule{..div..}, Rule{..#id..}, Rule{...}] }
pub fn parse_stylesheet(origin: &str, input: &str) -> Stylesheet {
    let mut rules = Vec::new();
    for block in input.split('}') {
        if let Some((selector_str, declaration_str)) = block.split_once('{') {
            let declarations = parse_declarations(declaration_str);
            if declarations.is_empty() {
                continue;
            }
            for selector in selector_str.split(',').filter_map(Selector::parse) {
                rules.push(Rule {
                    selector,
                    declarations: declarations.clone(),
                });
            }
        }
    }
    Stylesheet {
        origin: origin.to_string(),
        rules,
    }
}

// input: "color: red; font-size: 12px;"
// output: vec![Declaration { name: "color", value: "red" }, ...]
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = n.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            let value = v.trim().to_string();
            if value.is_empty() {
                return None;
            }
            Some(Declaration { name, value })
        })
        .collect()
}
