//! Form objects (`form`) and equations (`eqed`).
//!
//! Both carry the common object block in the control header and their own data
//! in a single child record.

use super::children::Children;
use super::common::read_object_common;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::header::since;
use crate::hwp5::record::TagId;
use crate::model::{ColorRef, Equation, FormObject};

/// Reads a `form` control. The FORM_OBJECT child holds a type tag and the
/// property string, prefixed by its length in code units.
pub fn decode_form(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<FormObject> {
    let mut form = FormObject {
        common: read_object_common(r)?,
        ..Default::default()
    };

    let Some(node) = children.next_if(TagId::FormObject) else {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            r.offset(),
            "form control without FORM_OBJECT record",
        );
        return Ok(form);
    };
    let mut data = ctx.reader(&node.record);
    form.form_type = data.read_u32()?;
    let len = data.read_u32()? as usize;
    form.properties = String::from_utf16_lossy(&data.read_units(len)?);
    ctx.check_consumed(&node.record, &data);
    Ok(form)
}

/// Reads an `eqed` control and its EQEDIT child.
pub fn decode_equation(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Equation> {
    let mut equation = Equation {
        common: read_object_common(r)?,
        ..Default::default()
    };

    let Some(node) = children.next_if(TagId::EqEdit) else {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            r.offset(),
            "equation control without EQEDIT record",
        );
        return Ok(equation);
    };
    let mut data = ctx.reader(&node.record);
    equation.property = data.read_u32()?;
    equation.script = data.read_string()?;
    equation.base_size = data.read_u32()?;
    equation.color = ColorRef(data.read_u32()?);
    equation.baseline = data.read_i16()?;
    equation.version = data.optional_string(since::BASELINE)?;
    equation.font_name = data.optional_string(since::BASELINE)?;
    ctx.check_consumed(&node.record, &data);
    Ok(equation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::hwp5::header::Version;
    use crate::hwp5::record::{build_tree, frame_stream, RecordNode};
    use crate::hwp5::test_support::{Payload, RecordWriter};

    fn tree(writer: &RecordWriter, diags: &mut Diagnostics) -> Vec<RecordNode> {
        build_tree(frame_stream(writer.finish(), diags).unwrap(), diags)
    }

    #[test]
    fn test_equation() {
        let eq = Payload::new()
            .u32(0)
            .string("{a+b} over 2")
            .u32(1000)
            .u32(0)
            .i16(86)
            .string("Equation Version 60")
            .string("HancomEQN")
            .build();
        let mut writer = RecordWriter::new();
        writer
            .record(
                TagId::CtrlHeader,
                0,
                &Payload::new().ctrl_id(b"eqed").object_common(1, 3000, 1500).build(),
            )
            .record(TagId::EqEdit, 1, &eq);
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let mut r = ctx.reader(&nodes[0].record);
        r.read_u32().unwrap();
        let mut children = Children::new(&nodes[0].children);
        let equation = decode_equation(&mut r, &mut children, &mut ctx).unwrap();
        assert!(equation.common.treat_as_char);
        assert_eq!(equation.common.width, 3000);
        assert_eq!(equation.script, "{a+b} over 2");
        assert_eq!(equation.baseline, 86);
        assert_eq!(equation.font_name.as_deref(), Some("HancomEQN"));
        assert!(diags.is_empty(), "{:?}", diags.entries());
    }

    #[test]
    fn test_form_object() {
        let props = "CommandButton";
        let units: Vec<u16> = props.encode_utf16().collect();
        let data = Payload::new()
            .u32(u32::from_be_bytes(*b"tbp+"))
            .u32(units.len() as u32)
            .units(&units)
            .build();
        let mut writer = RecordWriter::new();
        writer
            .record(
                TagId::CtrlHeader,
                0,
                &Payload::new().ctrl_id(b"form").object_common(0, 100, 100).build(),
            )
            .record(TagId::FormObject, 1, &data);
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let mut r = ctx.reader(&nodes[0].record);
        r.read_u32().unwrap();
        let mut children = Children::new(&nodes[0].children);
        let form = decode_form(&mut r, &mut children, &mut ctx).unwrap();
        assert_eq!(form.properties, props);
        assert_eq!(form.common.height, 100);
    }

    #[test]
    fn test_equation_without_data_record() {
        let mut writer = RecordWriter::new();
        writer.record(
            TagId::CtrlHeader,
            0,
            &Payload::new().ctrl_id(b"eqed").object_common(0, 1, 1).build(),
        );
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let mut r = ctx.reader(&nodes[0].record);
        r.read_u32().unwrap();
        let mut children = Children::new(&nodes[0].children);
        let equation = decode_equation(&mut r, &mut children, &mut ctx).unwrap();
        assert!(equation.script.is_empty());
        assert_eq!(diags.count(DiagnosticKind::Inconsistent), 1);
    }
}
