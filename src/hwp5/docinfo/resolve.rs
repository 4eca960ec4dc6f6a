//! Cross-reference pass over a complete resource table.
//!
//! Runs once after every DocInfo record has been decoded. Face names are copied
//! into the char shapes that use them; ids that point past their list are
//! reported but left as stored.

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::model::{DocInfo, HeadShape, Language, ResourceList};

pub fn resolve(info: &mut DocInfo, diags: &mut Diagnostics) {
    resolve_char_shapes(info, diags);
    check_para_shapes(info, diags);
    check_styles(info, diags);
}

fn resolve_char_shapes(info: &mut DocInfo, diags: &mut Diagnostics) {
    let faces = &info.face_names;
    let border_fills = &info.border_fills;

    for (index, shape) in info.char_shapes.iter_mut().enumerate() {
        for language in Language::ALL {
            let slot = language.index();
            let id = shape.face_ids[slot] as u32;
            match faces.get(language, id) {
                Some(face) => shape.face_names[slot] = Some(face.name.clone()),
                None => diags.push(
                    DiagnosticKind::DanglingReference,
                    0,
                    format!("char shape {index}: {language:?} face {id} not defined"),
                ),
            }
        }
        if let Some(id) = shape.border_fill_id {
            check_optional(border_fills, id as u32, diags, || {
                format!("char shape {index}: border fill {id}")
            });
        }
    }
}

fn check_para_shapes(info: &DocInfo, diags: &mut Diagnostics) {
    for (index, shape) in info.para_shapes.iter().enumerate() {
        let tab_def = shape.tab_def_id as u32;
        if !info.tab_defs.contains(tab_def) {
            diags.push(
                DiagnosticKind::DanglingReference,
                0,
                format!("para shape {index}: tab def {tab_def} not defined"),
            );
        }

        let head = shape.numbering_id as u32;
        match shape.attributes.head_shape {
            HeadShape::None => {}
            HeadShape::Outline | HeadShape::Numbering => {
                check_optional(&info.numberings, head, diags, || {
                    format!("para shape {index}: numbering {head}")
                })
            }
            HeadShape::Bullet => check_optional(&info.bullets, head, diags, || {
                format!("para shape {index}: bullet {head}")
            }),
        }

        let border_fill = shape.border_fill_id as u32;
        check_optional(&info.border_fills, border_fill, diags, || {
            format!("para shape {index}: border fill {border_fill}")
        });
    }
}

fn check_styles(info: &DocInfo, diags: &mut Diagnostics) {
    for (index, style) in info.styles.iter().enumerate() {
        if !info.para_shapes.contains(style.para_shape_id as u32) {
            diags.push(
                DiagnosticKind::DanglingReference,
                0,
                format!(
                    "style {index} ({}): para shape {} not defined",
                    style.name, style.para_shape_id
                ),
            );
        }
        if !info.char_shapes.contains(style.char_shape_id as u32) {
            diags.push(
                DiagnosticKind::DanglingReference,
                0,
                format!(
                    "style {index} ({}): char shape {} not defined",
                    style.name, style.char_shape_id
                ),
            );
        }
    }
}

/// Checks an id into a one-based list where 0 means "none".
fn check_optional<T>(
    list: &ResourceList<T>,
    id: u32,
    diags: &mut Diagnostics,
    what: impl FnOnce() -> String,
) {
    if id != 0 && !list.contains(id) {
        diags.push(
            DiagnosticKind::DanglingReference,
            0,
            format!("{} not defined", what()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BorderFill, CharShape, FaceName, ParaShape, Style, TabDef};

    fn face(name: &str) -> FaceName {
        FaceName {
            name: name.into(),
            ..Default::default()
        }
    }

    fn table_with_faces() -> DocInfo {
        let mut info = DocInfo::new();
        for language in Language::ALL {
            let list = info.face_names.list_mut(language);
            list.push(face(&format!("{language:?}-0")));
            list.push(face(&format!("{language:?}-1")));
        }
        info
    }

    #[test]
    fn test_face_names_resolved_per_language() {
        let mut info = table_with_faces();
        info.char_shapes.push(CharShape {
            face_ids: [1, 0, 1, 0, 1, 0, 1],
            ..Default::default()
        });

        let mut diags = Diagnostics::new("DocInfo");
        resolve(&mut info, &mut diags);

        let shape = info.char_shapes.get(0).unwrap();
        assert_eq!(shape.face_names[0].as_deref(), Some("Hangul-1"));
        assert_eq!(shape.face_names[1].as_deref(), Some("Latin-0"));
        assert_eq!(shape.face_names[6].as_deref(), Some("User-1"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_dangling_references_reported() {
        let mut info = table_with_faces();
        info.border_fills.push(BorderFill::default());
        info.tab_defs.push(TabDef::default());
        info.char_shapes.push(CharShape {
            face_ids: [0, 5, 0, 0, 0, 0, 0],
            border_fill_id: Some(2),
            ..Default::default()
        });
        let mut para = ParaShape {
            numbering_id: 1,
            border_fill_id: 1,
            ..Default::default()
        };
        para.attributes.head_shape = HeadShape::Bullet;
        info.para_shapes.push(para);
        info.styles.push(Style {
            name: "본문".into(),
            para_shape_id: 0,
            char_shape_id: 4,
            ..Default::default()
        });

        let mut diags = Diagnostics::new("DocInfo");
        resolve(&mut info, &mut diags);

        // Latin face 5, border fill 2, bullet 1, style char shape 4.
        assert_eq!(diags.count(DiagnosticKind::DanglingReference), 4);
        let shape = info.char_shapes.get(0).unwrap();
        assert_eq!(shape.face_names[1], None);
        assert_eq!(shape.border_fill_id, Some(2));
    }

    #[test]
    fn test_zero_ids_mean_none() {
        let mut info = table_with_faces();
        info.tab_defs.push(TabDef::default());
        let mut para = ParaShape::default();
        para.attributes.head_shape = HeadShape::Numbering;
        info.para_shapes.push(para);

        let mut diags = Diagnostics::new("DocInfo");
        resolve(&mut info, &mut diags);
        assert!(diags.is_empty());
    }
}
