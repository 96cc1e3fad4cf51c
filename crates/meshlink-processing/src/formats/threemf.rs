//! 3MF output: an OPC zip package holding a single mesh object.

use crate::error::{ConversionError, ConversionResult};
use crate::mesh::IndexedMesh;
use meshlink_core::MeshFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>
"#;

const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/3D/3dmodel.model" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>
"#;

pub(crate) const MODEL_PATH: &str = "3D/3dmodel.model";

const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

fn xml_error(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::encode(MeshFormat::ThreeMf, e)
}

fn model_xml(mesh: &IndexedMesh) -> ConversionResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(256 + mesh.vertices.len() * 48 + mesh.faces.len() * 40);
    let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let mut model = BytesStart::new("model");
    model.push_attribute(("unit", "millimeter"));
    model.push_attribute(("xml:lang", "en-US"));
    model.push_attribute(("xmlns", CORE_NAMESPACE));
    writer.write_event(Event::Start(model)).map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("resources")))
        .map_err(xml_error)?;

    let mut object = BytesStart::new("object");
    object.push_attribute(("id", "1"));
    object.push_attribute(("type", "model"));
    writer.write_event(Event::Start(object)).map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("mesh")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("vertices")))
        .map_err(xml_error)?;
    for [x, y, z] in &mesh.vertices {
        let mut vertex = BytesStart::new("vertex");
        vertex.push_attribute(("x", x.to_string().as_str()));
        vertex.push_attribute(("y", y.to_string().as_str()));
        vertex.push_attribute(("z", z.to_string().as_str()));
        writer.write_event(Event::Empty(vertex)).map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("vertices")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("triangles")))
        .map_err(xml_error)?;
    for [a, b, c] in &mesh.faces {
        let mut triangle = BytesStart::new("triangle");
        triangle.push_attribute(("v1", a.to_string().as_str()));
        triangle.push_attribute(("v2", b.to_string().as_str()));
        triangle.push_attribute(("v3", c.to_string().as_str()));
        writer.write_event(Event::Empty(triangle)).map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("triangles")))
        .map_err(xml_error)?;

    for name in ["mesh", "object", "resources"] {
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::Start(BytesStart::new("build")))
        .map_err(xml_error)?;
    let mut item = BytesStart::new("item");
    item.push_attribute(("objectid", "1"));
    writer.write_event(Event::Empty(item)).map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("build")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("model")))
        .map_err(xml_error)?;

    Ok(buffer)
}

pub fn write(mesh: &IndexedMesh) -> ConversionResult<Vec<u8>> {
    let encode_err = |e: zip::result::ZipError| ConversionError::encode(MeshFormat::ThreeMf, e);

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let model = model_xml(mesh)?;
        for (name, body) in [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", RELATIONSHIPS.as_bytes()),
            (MODEL_PATH, model.as_slice()),
        ] {
            zip.start_file(name, options).map_err(encode_err)?;
            zip.write_all(body)?;
        }

        zip.finish().map_err(encode_err)?;
    }

    Ok(buffer)
}
