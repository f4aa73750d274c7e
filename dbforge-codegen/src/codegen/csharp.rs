//! C# declaration tree and its pretty-printer
//!
//! Generators describe a file as a [`CsFile`] and never format text
//! themselves; [`CsFile::render`] decides indentation, braces and blank lines,
//! so equal trees always render to equal text.

/// Indented line writer shared by the C# and SQL emitters.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    indent: usize,
}

impl CodeWriter {
    const INDENT: &'static str = "    ";

    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.buf.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.buf.push_str(Self::INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write an empty line, never two in a row
    pub fn blank(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `header` then `{`, indenting what follows
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.line("{");
        self.indent();
    }

    /// Close a block opened with [`open`](Self::open)
    pub fn close(&mut self) {
        self.close_with("}");
    }

    pub fn close_with(&mut self, closing: &str) {
        self.dedent();
        self.line(closing);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// A statement inside a method, constructor or accessor body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Line(String),
    Comment(String),
    Blank,
    /// `header { body }`, closed by `closing` (`}` or `};`)
    Block {
        header: String,
        body: Vec<Stmt>,
        closing: &'static str,
    },
}

impl Stmt {
    pub fn line(text: impl Into<String>) -> Self {
        Stmt::Line(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Stmt::Comment(text.into())
    }

    pub fn block(header: impl Into<String>, body: Vec<Stmt>) -> Self {
        Stmt::Block {
            header: header.into(),
            body,
            closing: "}",
        }
    }

    /// Object or collection initializer ending in `};`
    pub fn initializer(header: impl Into<String>, body: Vec<Stmt>) -> Self {
        Stmt::Block {
            header: header.into(),
            body,
            closing: "};",
        }
    }

    fn render(&self, w: &mut CodeWriter) {
        match self {
            Stmt::Line(text) => w.line(text),
            Stmt::Comment(text) => w.line(&format!("// {}", text)),
            Stmt::Blank => w.line(""),
            Stmt::Block {
                header,
                body,
                closing,
            } => {
                w.open(header);
                render_body(w, body);
                w.close_with(closing);
            }
        }
    }
}

fn render_body(w: &mut CodeWriter, body: &[Stmt]) {
    for stmt in body {
        stmt.render(w);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessors {
    /// `{ get; set; }` with an optional initializer
    Auto { init: Option<String> },
    /// Getter returning `field`, setter running `setter`
    Backed { field: String, setter: Vec<Stmt> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub doc: Option<String>,
    /// Empty for interface members
    pub modifiers: String,
    pub ty: String,
    pub name: String,
    pub accessors: Accessors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub doc: Option<String>,
    pub modifiers: String,
    /// Return type; `None` for constructors
    pub returns: Option<String>,
    pub name: String,
    pub params: Vec<Param>,
    /// `None` renders a signature ending in `;`
    pub body: Option<Vec<Stmt>>,
}

impl Method {
    pub fn new(modifiers: &str, returns: &str, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            doc: None,
            modifiers: modifiers.to_string(),
            returns: Some(returns.to_string()),
            name: name.to_string(),
            params,
            body: Some(body),
        }
    }

    pub fn constructor(modifiers: &str, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            doc: None,
            modifiers: modifiers.to_string(),
            returns: None,
            name: name.to_string(),
            params,
            body: Some(body),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field {
        modifiers: String,
        ty: String,
        name: String,
        init: Option<String>,
    },
    Property(Property),
    Method(Method),
    EnumValue { name: String, value: String },
    /// Stands in for a member that could not be generated
    Comment(Vec<String>),
}

impl Member {
    pub fn field(modifiers: &str, ty: &str, name: &str, init: Option<String>) -> Self {
        Member::Field {
            modifiers: modifiers.to_string(),
            ty: ty.to_string(),
            name: name.to_string(),
            init,
        }
    }

    pub fn auto_property(modifiers: &str, ty: &str, name: &str) -> Self {
        Member::Property(Property {
            doc: None,
            modifiers: modifiers.to_string(),
            ty: ty.to_string(),
            name: name.to_string(),
            accessors: Accessors::Auto { init: None },
        })
    }

    /// Members of the same group are written without blank lines between them.
    fn compact_group(&self) -> Option<u8> {
        match self {
            Member::Field { .. } => Some(0),
            Member::Property(Property {
                doc: None,
                accessors: Accessors::Auto { .. },
                ..
            }) => Some(1),
            Member::EnumValue { .. } => Some(2),
            Member::Method(Method {
                doc: None,
                body: None,
                ..
            }) => Some(3),
            _ => None,
        }
    }

    fn render(&self, w: &mut CodeWriter) {
        match self {
            Member::Field {
                modifiers,
                ty,
                name,
                init,
            } => {
                let decl = join_words(&[modifiers, ty, name]);
                match init {
                    Some(init) => w.line(&format!("{} = {};", decl, init)),
                    None => w.line(&format!("{};", decl)),
                }
            }
            Member::Property(property) => render_property(w, property),
            Member::Method(method) => render_method(w, method),
            Member::EnumValue { name, value } => w.line(&format!("{} = {},", name, value)),
            Member::Comment(lines) => {
                for line in lines {
                    w.line(&format!("// {}", line));
                }
            }
        }
    }
}

fn render_doc(w: &mut CodeWriter, doc: &Option<String>) {
    if let Some(doc) = doc {
        w.line("/// <summary>");
        for line in doc.lines() {
            w.line(&format!("/// {}", line));
        }
        w.line("/// </summary>");
    }
}

fn render_property(w: &mut CodeWriter, p: &Property) {
    render_doc(w, &p.doc);
    let decl = join_words(&[&p.modifiers, &p.ty, &p.name]);
    match &p.accessors {
        Accessors::Auto { init: None } => w.line(&format!("{} {{ get; set; }}", decl)),
        Accessors::Auto { init: Some(init) } => {
            w.line(&format!("{} {{ get; set; }} = {};", decl, init))
        }
        Accessors::Backed { field, setter } => {
            w.open(&decl);
            w.line(&format!("get {{ return {}; }}", field));
            w.open("set");
            render_body(w, setter);
            w.close();
            w.close();
        }
    }
}

fn render_method(w: &mut CodeWriter, m: &Method) {
    render_doc(w, &m.doc);
    let head = match &m.returns {
        Some(returns) => join_words(&[&m.modifiers, returns, &m.name]),
        None => join_words(&[&m.modifiers, &m.name]),
    };
    let signature = format!("{}({})", head, param_list(&m.params));
    match &m.body {
        None => w.line(&format!("{};", signature)),
        Some(body) => {
            w.open(&signature);
            render_body(w, body);
            w.close();
        }
    }
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

impl TypeKind {
    fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

/// A class, interface or enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub doc: Option<String>,
    pub modifiers: String,
    pub name: String,
    /// Base class and interfaces, or the underlying type of an enum
    pub bases: Vec<String>,
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, modifiers: &str, name: &str) -> Self {
        Self {
            kind,
            doc: None,
            modifiers: modifiers.to_string(),
            name: name.to_string(),
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn extend(&mut self, members: impl IntoIterator<Item = Member>) {
        self.members.extend(members);
    }

    fn render(&self, w: &mut CodeWriter) {
        render_doc(w, &self.doc);
        let mut header = join_words(&[&self.modifiers, self.kind.keyword(), &self.name]);
        if !self.bases.is_empty() {
            header = format!("{} : {}", header, self.bases.join(", "));
        }
        w.open(&header);
        let mut previous: Option<Option<u8>> = None;
        for member in &self.members {
            let group = member.compact_group();
            if let Some(prev) = previous {
                if prev.is_none() || prev != group {
                    w.blank();
                }
            }
            member.render(w);
            previous = Some(group);
        }
        w.close();
    }
}

/// One C# source file with a single namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsFile {
    pub header: Vec<String>,
    pub usings: Vec<String>,
    pub namespace: String,
    pub types: Vec<TypeDecl>,
}

impl CsFile {
    pub fn new(namespace: &str) -> Self {
        Self {
            header: Vec::new(),
            usings: Vec::new(),
            namespace: namespace.to_string(),
            types: Vec::new(),
        }
    }

    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Add a `using` directive; duplicates are dropped.
    pub fn using(mut self, namespace: &str) -> Self {
        if !self.usings.iter().any(|u| u == namespace) {
            self.usings.push(namespace.to_string());
        }
        self
    }

    pub fn usings<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        namespaces
            .into_iter()
            .fold(self, |file, ns| file.using(ns.as_ref()))
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    pub fn render(&self) -> String {
        let mut w = CodeWriter::new();
        if !self.header.is_empty() {
            w.line("// <auto-generated>");
            for line in &self.header {
                w.line(&format!("//     {}", line));
            }
            w.line("// </auto-generated>");
            w.blank();
        }
        for using in &self.usings {
            w.line(&format!("using {};", using));
        }
        if !self.usings.is_empty() {
            w.blank();
        }
        w.open(&format!("namespace {}", self.namespace));
        for (i, decl) in self.types.iter().enumerate() {
            if i > 0 {
                w.blank();
            }
            decl.render(&mut w);
        }
        w.close();
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_class() {
        let mut class = TypeDecl::new(TypeKind::Class, "public partial", "Game").with_doc("A game.");
        class.push(Member::field("private", "int", "_id", None));
        class.push(Member::field("private", "string", "_name", Some("\"\"".into())));
        class.push(Member::auto_property("public", "int", "Id"));
        class.push(Member::auto_property("public", "string", "Name"));
        class.push(Member::Method(Method::constructor("public", "Game", vec![], vec![])));
        class.push(Member::Method(Method::new(
            "public override",
            "string",
            "ToString",
            vec![],
            vec![Stmt::line("return Name;")],
        )));

        let file = CsFile::new("Arcade")
            .header_line("Generated for table [dbo].[Game].")
            .using("System")
            .using("System")
            .with_type(class);

        let expected = r#"// <auto-generated>
//     Generated for table [dbo].[Game].
// </auto-generated>

using System;

namespace Arcade
{
    /// <summary>
    /// A game.
    /// </summary>
    public partial class Game
    {
        private int _id;
        private string _name = "";

        public int Id { get; set; }
        public string Name { get; set; }

        public Game()
        {
        }

        public override string ToString()
        {
            return Name;
        }
    }
}
"#;
        assert_eq!(file.render(), expected);
    }

    #[test]
    fn test_render_backed_property_and_blocks() {
        let mut class = TypeDecl::new(TypeKind::Class, "public", "T").with_base("Base");
        class.push(Member::Property(Property {
            doc: None,
            modifiers: "public".into(),
            ty: "int".into(),
            name: "Id".into(),
            accessors: Accessors::Backed {
                field: "_id".into(),
                setter: vec![Stmt::line("_id = value;")],
            },
        }));
        class.push(Member::Method(Method::new(
            "public",
            "int",
            "Hash",
            vec![Param::new("int", "seed")],
            vec![Stmt::block("unchecked", vec![Stmt::line("return seed * 3;")])],
        )));
        let text = CsFile::new("N").with_type(class).render();
        assert!(text.contains("    public class T : Base\n"));
        assert!(text.contains(
            "        public int Id\n        {\n            get { return _id; }\n            set\n            {\n                _id = value;\n            }\n        }\n"
        ));
        assert!(text.contains("            unchecked\n            {\n                return seed * 3;\n            }\n"));
    }

    #[test]
    fn test_render_interface_and_enum() {
        let mut iface = TypeDecl::new(TypeKind::Interface, "public", "IGame");
        iface.push(Member::auto_property("", "int", "Id"));
        let mut kind = TypeDecl::new(TypeKind::Enum, "public", "Genre").with_base("long");
        kind.push(Member::EnumValue {
            name: "Arcade".into(),
            value: "1".into(),
        });
        kind.push(Member::EnumValue {
            name: "Puzzle".into(),
            value: "2".into(),
        });
        let text = CsFile::new("N").with_type(iface).with_type(kind).render();
        assert!(text.contains("        int Id { get; set; }\n"));
        assert!(text.contains("    public enum Genre : long\n    {\n        Arcade = 1,\n        Puzzle = 2,\n    }\n"));
        // blank line between the two types
        assert!(text.contains("    }\n\n    public enum"));
    }

    #[test]
    fn test_initializer_block() {
        let mut w = CodeWriter::new();
        Stmt::initializer("var xs = new List<int>", vec![Stmt::line("1,")]).render(&mut w);
        assert_eq!(w.finish(), "var xs = new List<int>\n{\n    1,\n};\n");
    }

    #[test]
    fn test_blank_never_doubles() {
        let mut w = CodeWriter::new();
        w.blank();
        w.line("a");
        w.blank();
        w.blank();
        w.line("b");
        assert_eq!(w.finish(), "a\n\nb\n");
    }
}
