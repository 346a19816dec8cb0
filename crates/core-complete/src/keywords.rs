//! Static keyword tables offered as completion candidates.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub text: &'static str,
    pub description: &'static str,
}

const fn kw(text: &'static str, description: &'static str) -> Keyword {
    Keyword { text, description }
}

/// Always offered, regardless of file type.
pub static GENERAL: &[Keyword] = &[
    kw("func", "Function declaration"),
    kw("return", "Return statement"),
    kw("if", "Conditional statement"),
    kw("else", "Else clause"),
    kw("for", "Loop statement"),
    kw("while", "While loop"),
    kw("switch", "Switch statement"),
    kw("case", "Case clause"),
    kw("break", "Break statement"),
    kw("continue", "Continue statement"),
    kw("struct", "Structure definition"),
    kw("interface", "Interface definition"),
    kw("class", "Class definition"),
    kw("import", "Import statement"),
    kw("package", "Package declaration"),
    kw("const", "Constant declaration"),
    kw("var", "Variable declaration"),
    kw("type", "Type definition"),
    kw("map", "Map data structure"),
    kw("slice", "Slice data structure"),
    kw("array", "Array data structure"),
    kw("string", "String type"),
    kw("int", "Integer type"),
    kw("float", "Float type"),
    kw("bool", "Boolean type"),
    kw("true", "Boolean true"),
    kw("false", "Boolean false"),
    kw("nil", "Nil value"),
];

pub static GO: &[Keyword] = &[
    kw("defer", "Defer execution"),
    kw("go", "Start goroutine"),
    kw("chan", "Channel type"),
    kw("select", "Select statement"),
    kw("make", "Allocate and initialize"),
    kw("new", "Allocate memory"),
    kw("append", "Append to slice"),
    kw("len", "Length function"),
    kw("cap", "Capacity function"),
    kw("panic", "Panic function"),
    kw("recover", "Recover function"),
];

pub static SCRIPT: &[Keyword] = &[
    kw("function", "Function declaration"),
    kw("const", "Constant declaration"),
    kw("let", "Block-scoped variable"),
    kw("var", "Variable declaration"),
    kw("console.log", "Print to console"),
    kw("document", "DOM document"),
    kw("window", "Browser window"),
    kw("setTimeout", "Set timeout"),
    kw("setInterval", "Set interval"),
    kw("Promise", "Promise object"),
    kw("async", "Async function"),
    kw("await", "Await expression"),
];

/// Extra table for a file extension (without the leading dot).
pub fn for_extension(ext: &str) -> &'static [Keyword] {
    match ext {
        "go" => GO,
        "js" | "ts" => SCRIPT,
        _ => &[],
    }
}
