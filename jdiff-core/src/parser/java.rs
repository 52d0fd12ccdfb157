//! Java declaration-tree extractor using tree-sitter.

use tree_sitter::{Node, Parser};

use super::helpers::{
    end_of_source, find_child_by_type, find_children_by_type, first_error, get_node_text,
    leaf_tokens, named_children, node_range, span_range, start_location, token_from_node,
};
use crate::error::{CompareError, Result};
use crate::location::{Location, LocationRange};
use crate::types::{Declaration, DeclarationKind, Parameter, ParameterList, Token, TypeKind};

/// Parse Java source code into a compilation-unit declaration.
pub fn parse(source: &str, file_path: &str) -> Result<Declaration> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| parse_failure(file_path, Location::start_of_file(), e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| {
        parse_failure(
            file_path,
            Location::start_of_file(),
            "Failed to parse Java source".to_string(),
        )
    })?;
    let root = tree.root_node();

    if let Some(err) = first_error(&root) {
        let message = if err.is_missing() {
            format!("missing `{}`", err.kind())
        } else {
            let text = get_node_text(&err, source);
            let snippet: String = text.chars().take(40).collect();
            format!("syntax error near `{}`", snippet.trim())
        };
        return Err(parse_failure(file_path, start_location(&err), message));
    }

    let start = Location::start_of_file();
    let range = LocationRange::new(start, end_of_source(source).max(start))?;
    let mut unit = Declaration::new(DeclarationKind::CompilationUnit, file_path, range);

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                if let Some(package) = extract_package(&child, source) {
                    unit.children.push(package);
                }
            }
            "import_declaration" => {
                if let Some(import) = extract_import(&child, source) {
                    unit.children.push(import);
                }
            }
            "line_comment" | "block_comment" | ";" => {}
            kind => {
                if let Some(decl) = extract_type(&child, source, kind) {
                    unit.children.push(decl);
                }
            }
        }
    }

    Ok(unit)
}

fn parse_failure(path: &str, at: Location, message: String) -> CompareError {
    CompareError::Parse {
        path: path.to_string(),
        line: at.line,
        column: at.column,
        message,
    }
}

/// Extract package declaration.
fn extract_package(node: &Node, source: &str) -> Option<Declaration> {
    let name = find_child_by_type(node, "scoped_identifier")
        .or_else(|| find_child_by_type(node, "identifier"))?;
    let mut package = Declaration::new(
        DeclarationKind::Package,
        get_node_text(&name, source),
        node_range(node),
    )
    .with_name_range(node_range(&name));
    extract_modifiers(node, source, &mut package);
    Some(package)
}

/// Extract import declaration; static imports are named `static a.b.C.d`.
fn extract_import(node: &Node, source: &str) -> Option<Declaration> {
    let mut is_static = false;
    let mut parts: Vec<Node> = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import" | ";" | "line_comment" | "block_comment" => {}
            "static" => is_static = true,
            _ => parts.push(child),
        }
    }

    let (first, last) = (parts.first()?, parts.last()?);
    let path: String = parts.iter().map(|p| get_node_text(p, source)).collect();
    let name = if is_static {
        format!("static {}", path)
    } else {
        path
    };

    Some(
        Declaration::new(DeclarationKind::Import, name, node_range(node))
            .with_name_range(span_range(first, last)),
    )
}

/// Extract a type declaration, or an unsupported placeholder for other
/// top-level and member constructs.
fn extract_type(node: &Node, source: &str, kind: &str) -> Option<Declaration> {
    let type_kind = match kind {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        "annotation_type_declaration" => TypeKind::Annotation,
        _ => return Some(unsupported(node, source)),
    };

    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(
        DeclarationKind::Type(type_kind),
        get_node_text(&name, source),
        node_range(node),
    )
    .with_name_range(node_range(&name));

    extract_modifiers(node, source, &mut decl);
    decl.type_parameters =
        find_child_by_type(node, "type_parameters").map(|tp| token_from_node(&tp, source));

    if let Some(superclass) = find_child_by_type(node, "superclass") {
        decl.extends = type_tokens(&superclass, source);
    }
    if let Some(extends) = find_child_by_type(node, "extends_interfaces") {
        decl.extends = type_list_tokens(&extends, source);
    }
    if let Some(implements) = find_child_by_type(node, "super_interfaces") {
        decl.implements = type_list_tokens(&implements, source);
    }

    if let Some(body) = node.child_by_field_name("body") {
        decl.body_start = start_location(&body);
        extract_members(&body, source, &mut decl.children);
    }

    Some(decl)
}

fn unsupported(node: &Node, source: &str) -> Declaration {
    let name = node
        .child_by_field_name("name")
        .map(|n| get_node_text(&n, source).to_string())
        .unwrap_or_else(|| node.kind().to_string());
    Declaration::new(
        DeclarationKind::Unsupported(node.kind().to_string()),
        name,
        node_range(node),
    )
}

/// Extract members of a class, interface, enum or annotation body.
fn extract_members(body: &Node, source: &str, members: &mut Vec<Declaration>) {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "{" | "}" | ";" | "," | "line_comment" | "block_comment" => {}
            "field_declaration" | "constant_declaration" => {
                members.extend(extract_fields(&child, source));
            }
            "method_declaration" => {
                if let Some(method) = extract_method(&child, source) {
                    members.push(method);
                }
            }
            "constructor_declaration" => {
                if let Some(ctor) = extract_constructor(&child, source) {
                    members.push(ctor);
                }
            }
            "static_initializer" => {
                members.push(extract_initializer(&child, source, true));
            }
            "block" => {
                members.push(extract_initializer(&child, source, false));
            }
            "enum_constant" => {
                if let Some(constant) = extract_enum_constant(&child, source) {
                    members.push(constant);
                }
            }
            "enum_body_declarations" => {
                extract_members(&child, source, members);
            }
            kind => {
                if let Some(decl) = extract_type(&child, source, kind) {
                    members.push(decl);
                }
            }
        }
    }
}

/// Extract modifiers and annotations.
fn extract_modifiers(node: &Node, source: &str, decl: &mut Declaration) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifiers" => {
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    match inner.kind() {
                        "marker_annotation" | "annotation" => {
                            decl.annotations.push(token_from_node(&inner, source));
                        }
                        "line_comment" | "block_comment" => {}
                        _ => decl.modifiers.push(token_from_node(&inner, source)),
                    }
                }
            }
            // Package annotations sit directly on the declaration.
            "marker_annotation" | "annotation" => {
                decl.annotations.push(token_from_node(&child, source));
            }
            _ => {}
        }
    }
}

/// Types named by a `superclass` or `throws` clause.
fn type_tokens(node: &Node, source: &str) -> Vec<Token> {
    named_children(node)
        .iter()
        .map(|t| token_from_node(t, source))
        .collect()
}

/// Types of an `implements`/`extends` clause wrapping a `type_list`.
fn type_list_tokens(node: &Node, source: &str) -> Vec<Token> {
    match find_child_by_type(node, "type_list") {
        Some(list) => type_tokens(&list, source),
        None => type_tokens(node, source),
    }
}

/// Extract method declaration.
fn extract_method(node: &Node, source: &str) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(
        DeclarationKind::Method,
        get_node_text(&name, source),
        node_range(node),
    )
    .with_name_range(node_range(&name));

    extract_modifiers(node, source, &mut decl);
    decl.type_parameters =
        find_child_by_type(node, "type_parameters").map(|tp| token_from_node(&tp, source));
    decl.value_type = node
        .child_by_field_name("type")
        .map(|t| token_from_node(&t, source));
    extract_signature(node, source, &mut decl);

    if let Some(body) = node.child_by_field_name("body") {
        decl.body = leaf_tokens(&body, source);
    }

    Some(decl)
}

/// Extract constructor declaration.
fn extract_constructor(node: &Node, source: &str) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(
        DeclarationKind::Constructor,
        get_node_text(&name, source),
        node_range(node),
    )
    .with_name_range(node_range(&name));

    extract_modifiers(node, source, &mut decl);
    decl.type_parameters =
        find_child_by_type(node, "type_parameters").map(|tp| token_from_node(&tp, source));
    extract_signature(node, source, &mut decl);

    if let Some(body) = node.child_by_field_name("body") {
        decl.body = leaf_tokens(&body, source);
    }

    Some(decl)
}

/// Parameters and throws clause shared by methods and constructors.
fn extract_signature(node: &Node, source: &str, decl: &mut Declaration) {
    if let Some(params) = node.child_by_field_name("parameters") {
        decl.parameters = Some(extract_parameters(&params, source));
    }
    if let Some(throws) = find_child_by_type(node, "throws") {
        decl.throws = type_tokens(&throws, source);
        decl.throws_range = Some(node_range(&throws));
    }
}

/// Extract parameters.
fn extract_parameters(node: &Node, source: &str) -> ParameterList {
    let mut params = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let param = match child.kind() {
            "formal_parameter" => extract_formal_parameter(&child, source),
            "spread_parameter" => extract_spread_parameter(&child, source),
            _ => None,
        };
        params.extend(param);
    }

    ParameterList {
        range: node_range(node),
        params,
    }
}

fn extract_formal_parameter(node: &Node, source: &str) -> Option<Parameter> {
    let type_node = node.child_by_field_name("type")?;
    let name_node = node.child_by_field_name("name")?;

    // `int values[]` declares an `int[]`
    let mut type_name = token_from_node(&type_node, source);
    if let Some(dims) = find_child_by_type(node, "dimensions") {
        type_name.text.push_str(get_node_text(&dims, source));
    }

    Some(Parameter {
        name: token_from_node(&name_node, source),
        type_name,
        range: node_range(node),
    })
}

fn extract_spread_parameter(node: &Node, source: &str) -> Option<Parameter> {
    let type_node = named_children(node)
        .into_iter()
        .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))?;
    let declarator = find_child_by_type(node, "variable_declarator")?;
    let name_node = declarator
        .child_by_field_name("name")
        .unwrap_or(declarator);

    let mut type_name = token_from_node(&type_node, source);
    type_name.text.push_str("...");

    Some(Parameter {
        name: token_from_node(&name_node, source),
        type_name,
        range: node_range(node),
    })
}

/// Extract field declarations, one per variable declarator.
fn extract_fields(node: &Node, source: &str) -> Vec<Declaration> {
    let mut template = Declaration::new(DeclarationKind::Field, "", node_range(node));
    extract_modifiers(node, source, &mut template);
    template.value_type = node
        .child_by_field_name("type")
        .map(|t| token_from_node(&t, source));

    find_children_by_type(node, "variable_declarator")
        .iter()
        .filter_map(|declarator| {
            let name = declarator.child_by_field_name("name")?;
            let mut field = template.clone();
            field.name = get_node_text(&name, source).to_string();
            field.name_range = node_range(&name);
            // `int x[], y;` declares `x` as an `int[]` and `y` as an `int`
            if let (Some(dims), Some(value_type)) =
                (find_child_by_type(declarator, "dimensions"), field.value_type.as_mut())
            {
                value_type.text.push_str(get_node_text(&dims, source));
            }
            if let Some(value) = declarator.child_by_field_name("value") {
                field.initializer = leaf_tokens(&value, source);
            }
            Some(field)
        })
        .collect()
}

/// Extract a static or instance initializer block.
fn extract_initializer(node: &Node, source: &str, is_static: bool) -> Declaration {
    let name = if is_static { "static" } else { "instance" };
    let mut decl = Declaration::new(
        DeclarationKind::Initializer { is_static },
        name,
        node_range(node),
    );
    let block = if is_static {
        find_child_by_type(node, "block")
    } else {
        Some(*node)
    };
    if let Some(block) = block {
        decl.body = leaf_tokens(&block, source);
    }
    decl
}

/// Extract an enum constant; arguments and class body count as its code.
fn extract_enum_constant(node: &Node, source: &str) -> Option<Declaration> {
    let name = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(
        DeclarationKind::EnumConstant,
        get_node_text(&name, source),
        node_range(node),
    )
    .with_name_range(node_range(&name));
    extract_modifiers(node, source, &mut decl);
    let name_end = decl.name_range.end();
    decl.body = leaf_tokens(node, source)
        .into_iter()
        .filter(|t| t.range.start() > name_end)
        .collect();
    Some(decl)
}
