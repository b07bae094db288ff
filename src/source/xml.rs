//! Small `roxmltree` helpers shared by the XML-based sources.

use std::path::Path;

use roxmltree::Node;

use crate::error::Rs2CocoError;

pub(crate) fn parse_document<'input>(
    xml: &'input str,
    path: &Path,
) -> Result<roxmltree::Document<'input>, Rs2CocoError> {
    roxmltree::Document::parse(xml).map_err(|source| Rs2CocoError::XmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

pub(crate) fn child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

pub(crate) fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

pub(crate) fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, Rs2CocoError> {
    child_element(node, tag).ok_or_else(|| Rs2CocoError::XmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

pub(crate) fn element_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

pub(crate) fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag).and_then(element_text)
}

pub(crate) fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, Rs2CocoError> {
    optional_child_text(node, tag).ok_or_else(|| Rs2CocoError::XmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}
