//! Document assembly and BTLx serialization.

use std::borrow::Cow;
use std::io::Write;

use joinery_math::Vec3;
use joinery_model::Assembly;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rayon::prelude::*;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::diagnostics::Diagnostic;
use crate::format::{format_fixed, format_flag};
use crate::part::Part;
use crate::settings::BtlxSettings;
use crate::{BtlxError, Result};

/// BTLx namespace.
pub const BTLX_NAMESPACE: &str = "https://www.design2machine.com";
/// Schema version written on the root element.
pub const BTLX_VERSION: &str = "2.0.0";
const SCHEMA_LOCATION: &str = "https://www.design2machine.com https://www.design2machine.com/btlx/btlx_2_0_0.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SHAPE_PRECISION: usize = 2;

/// All parts of one export, in beam order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    settings: BtlxSettings,
    parts: Vec<Part>,
}

impl Document {
    /// Build one part per beam.
    ///
    /// Parts are built in parallel and collected in beam order. Joint
    /// failures end up as diagnostics on their part; only an empty
    /// assembly, invalid settings or an unresolvable beam fail the build.
    #[instrument(skip_all, fields(beams = assembly.beams.len(), joints = assembly.joints.len()))]
    pub fn build(assembly: &Assembly, settings: &BtlxSettings) -> Result<Self> {
        if assembly.is_empty() {
            return Err(BtlxError::EmptyAssembly);
        }
        settings.validate()?;

        let parts = (0..assembly.beams.len())
            .into_par_iter()
            .map(|index| Part::build(index, assembly, settings))
            .collect::<Result<Vec<_>>>()?;

        let document = Self {
            settings: settings.clone(),
            parts,
        };
        info!(
            parts = document.parts.len(),
            processes = document.process_count(),
            diagnostics = document.diagnostics().count(),
            "document built"
        );
        Ok(document)
    }

    /// Parts in beam order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Settings the document was built with.
    pub fn settings(&self) -> &BtlxSettings {
        &self.settings
    }

    /// Total number of processes over all parts.
    pub fn process_count(&self) -> usize {
        self.parts.iter().map(|p| p.processes.len()).sum()
    }

    /// Diagnostics of every part, ordered by part index.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.parts.iter().flat_map(|p| p.diagnostics.iter())
    }

    /// Diagnostics as `part {index} message: ...` lines.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics().map(ToString::to_string).collect()
    }

    /// Serialize to a BTLx string.
    pub fn to_xml(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| BtlxError::Xml(e.to_string()))
    }

    /// Serialize to `out`.
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut xml = XmlOut::new(out);
        xml.declaration()?;
        xml.start(
            "BTLx",
            &[
                ("xmlns", BTLX_NAMESPACE.into()),
                ("xmlns:xsi", XSI_NAMESPACE.into()),
                ("xsi:schemaLocation", SCHEMA_LOCATION.into()),
                ("Language", "en".into()),
                ("Version", BTLX_VERSION.into()),
            ],
        )?;
        self.write_file_history(&mut xml)?;

        xml.start("Project", &[("Name", self.settings.project_name.as_str().into())])?;
        xml.start("Parts", &[])?;
        for part in &self.parts {
            self.write_part(&mut xml, part)?;
        }
        xml.end("Parts")?;
        xml.end("Project")?;
        xml.end("BTLx")?;
        xml.finish()
    }

    fn write_file_history<W: Write>(&self, xml: &mut XmlOut<W>) -> Result<()> {
        let s = &self.settings;
        xml.start("FileHistory", &[])?;
        xml.empty(
            "InitialExportProgram",
            &[
                ("CompanyName", s.company_name.as_str().into()),
                ("ProgramName", s.program_name.as_str().into()),
                ("ProgramVersion", s.program_version.as_str().into()),
                ("ComputerName", s.computer_name.as_str().into()),
                ("UserName", s.user_name.as_str().into()),
                ("FileName", s.file_name.as_str().into()),
                ("Date", s.date.as_deref().unwrap_or("").into()),
                ("Time", s.time.as_deref().unwrap_or("").into()),
                ("Comment", s.comment.as_str().into()),
            ],
        )?;
        xml.end("FileHistory")
    }

    fn write_part<W: Write>(&self, xml: &mut XmlOut<W>, part: &Part) -> Result<()> {
        let len = |v: f64| Cow::Owned(format_fixed(v, self.settings.point_precision));
        let refs = &part.reference;
        let number = part.single_member_number().to_string();

        xml.start(
            "Part",
            &[
                ("SingleMemberNumber", number.as_str().into()),
                ("AssemblyNumber", "".into()),
                ("OrderNumber", number.as_str().into()),
                ("Designation", "".into()),
                ("Annotation", "".into()),
                ("Storey", "".into()),
                ("Group", "".into()),
                ("Package", "".into()),
                ("Material", "".into()),
                ("TimberGrade", "".into()),
                ("QualityGrade", "".into()),
                ("Count", "1".into()),
                ("Length", len(refs.blank_length)),
                ("Height", len(refs.height)),
                ("Width", len(refs.width)),
                ("PlaningLength", "0".into()),
                ("Weight", "0".into()),
                ("ProcessingQuality", "automatic".into()),
                ("StoreyType", "".into()),
                ("ElementNumber", "00".into()),
                ("Layer", "0".into()),
                ("ModuleNumber", "".into()),
            ],
        )?;

        let guid = Uuid::new_v5(&Uuid::NAMESPACE_OID, number.as_bytes()).hyphenated().to_string();
        xml.start("Transformations", &[])?;
        xml.start("Transformation", &[("GUID", format!("{{{guid}}}").into())])?;
        xml.start("Position", &[])?;
        let frame = &refs.blank_frame;
        xml.empty("ReferencePoint", &self.xyz(&frame.origin.coords))?;
        xml.empty("XVector", &self.xyz(&frame.x_axis()))?;
        xml.empty("YVector", &self.xyz(&frame.y_axis()))?;
        xml.end("Position")?;
        xml.end("Transformation")?;
        xml.end("Transformations")?;

        xml.empty(
            "GrainDirection",
            &[
                ("X", "1".into()),
                ("Y", "0".into()),
                ("Z", "0".into()),
                ("Align", format_flag(false).into()),
            ],
        )?;
        xml.empty("ReferenceSide", &[("Side", "3".into()), ("Align", format_flag(false).into())])?;

        if part.processes.is_empty() {
            xml.empty("Processings", &[])?;
        } else {
            xml.start("Processings", &[])?;
            for (process_id, process) in part.processes.iter().enumerate() {
                let header: Vec<_> = process
                    .header_attributes(process_id)
                    .into_iter()
                    .map(|(k, v)| (k, Cow::Owned(v)))
                    .collect();
                xml.start(process.process_type(), &header)?;
                for (name, value) in process.fields() {
                    xml.text_element(name, &value.render(&self.settings))?;
                }
                xml.end(process.process_type())?;
            }
            xml.end("Processings")?;
        }

        if self.settings.emit_shape {
            self.write_shape(xml, part)?;
        }
        xml.end("Part")
    }

    /// Blank box as an indexed face set in blank-local coordinates.
    fn write_shape<W: Write>(&self, xml: &mut XmlOut<W>, part: &Part) -> Result<()> {
        // quads over the corners of ReferenceSides::blank_corners, -1 ends a face
        const FACES: [[usize; 4]; 6] = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        let coord_index = FACES
            .iter()
            .map(|f| format!("{} {} {} {} -1", f[0], f[1], f[2], f[3]))
            .collect::<Vec<_>>()
            .join(" ");
        let point = part
            .reference
            .blank_corners()
            .iter()
            .map(|p| {
                [p.x, p.y, p.z]
                    .iter()
                    .map(|v| format_fixed(*v, SHAPE_PRECISION))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" ");

        xml.start("Shape", &[])?;
        xml.start(
            "IndexedFaceSet",
            &[("convex", "true".into()), ("coordIndex", coord_index.into())],
        )?;
        xml.empty("Coordinate", &[("point", point.into())])?;
        xml.end("IndexedFaceSet")?;
        xml.end("Shape")
    }

    fn xyz(&self, v: &Vec3) -> [(&'static str, Cow<'static, str>); 3] {
        let p = self.settings.point_precision;
        [
            ("X", format_fixed(v.x, p).into()),
            ("Y", format_fixed(v.y, p).into()),
            ("Z", format_fixed(v.z, p).into()),
        ]
    }
}

// =============================================================================
// XML output
// =============================================================================

type Attr<'a> = (&'static str, Cow<'a, str>);

/// Thin wrapper over the quick-xml writer mapping its errors.
struct XmlOut<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlOut<W> {
    fn new(out: W) -> Self {
        Self {
            writer: Writer::new_with_indent(out, b' ', 2),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(|e| BtlxError::Xml(e.to_string()))
    }

    fn declaration(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn element<'a>(name: &'a str, attrs: &'a [Attr<'_>]) -> BytesStart<'a> {
        let mut elem = BytesStart::new(name);
        for (key, value) in attrs {
            elem.push_attribute((*key, value.as_ref()));
        }
        elem
    }

    fn start(&mut self, name: &str, attrs: &[Attr<'_>]) -> Result<()> {
        self.emit(Event::Start(Self::element(name, attrs)))
    }

    fn empty(&mut self, name: &str, attrs: &[Attr<'_>]) -> Result<()> {
        self.emit(Event::Empty(Self::element(name, attrs)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(mut self) -> Result<()> {
        self.writer.get_mut().write_all(b"\n")?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joinery_math::Point3;
    use joinery_model::{Beam, TButtJoint};

    fn t_assembly() -> Assembly {
        let mut assembly = Assembly::new();
        assembly.add_beam(Beam::from_endpoints(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 0.1, 0.1, None).unwrap());
        assembly.add_beam(
            Beam::from_endpoints(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 0.1, 0.1, None).unwrap(),
        );
        assembly.add_joint(TButtJoint::new(0, 1));
        assembly
    }

    #[test]
    fn test_empty_assembly_is_fatal() {
        let err = Document::build(&Assembly::new(), &BtlxSettings::default()).unwrap_err();
        assert!(matches!(err, BtlxError::EmptyAssembly));
    }

    #[test]
    fn test_header_and_parts() {
        let doc = Document::build(&t_assembly(), &BtlxSettings::default()).unwrap();
        let xml = doc.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns=\"https://www.design2machine.com\""));
        assert!(xml.contains("Version=\"2.0.0\""));
        assert!(xml.contains("<Project Name=\"joinery\">"));
        assert_eq!(xml.matches("<Part ").count(), 2);
        assert!(xml.contains("SingleMemberNumber=\"0\""));
        assert!(xml.contains("SingleMemberNumber=\"1\""));
        assert!(xml.contains("<Processings/>"));
        assert!(xml.contains("<StartX>0.050</StartX>"));
    }

    #[test]
    fn test_transformation_guid_is_stable() {
        let a = Document::build(&t_assembly(), &BtlxSettings::default()).unwrap().to_xml().unwrap();
        let guid = Uuid::new_v5(&Uuid::NAMESPACE_OID, b"0").hyphenated().to_string();
        assert!(a.contains(&format!("GUID=\"{{{guid}}}\"")));
    }

    #[test]
    fn test_shape_can_be_disabled() {
        let settings = BtlxSettings {
            emit_shape: false,
            ..BtlxSettings::default()
        };
        let with = Document::build(&t_assembly(), &BtlxSettings::default()).unwrap().to_xml().unwrap();
        let without = Document::build(&t_assembly(), &settings).unwrap().to_xml().unwrap();
        assert!(with.contains("<IndexedFaceSet"));
        assert!(with.contains("point=\"0.00 0.00 0.00 1.00 0.00 0.00"));
        assert!(!without.contains("<Shape>"));
    }

    #[test]
    fn test_messages_are_ordered_by_part() {
        let mut assembly = t_assembly();
        assembly.add_joint(joinery_model::TStirnversatzJoint::new(1, 0));
        assembly.add_joint(joinery_model::TStirnversatzJoint::new(0, 1));
        let doc = Document::build(&assembly, &BtlxSettings::default()).unwrap();
        let messages = doc.messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].starts_with("part 0 message: "));
        assert!(messages[3].starts_with("part 1 message: "));
    }

    #[test]
    fn test_diagnostic_part_matches_member_number() {
        let mut assembly = t_assembly();
        assembly.add_joint(joinery_model::TStirnversatzJoint::new(1, 0));
        let doc = Document::build(&assembly, &BtlxSettings::default()).unwrap();
        let xml = doc.to_xml().unwrap();
        for diagnostic in doc.diagnostics() {
            let part = &doc.parts()[diagnostic.part_index];
            assert_eq!(part.single_member_number(), diagnostic.part_index);
            let prefix = format!("part {} ", diagnostic.part_index);
            assert!(diagnostic.to_string().starts_with(&prefix));
            assert!(xml.contains(&format!("SingleMemberNumber=\"{}\"", diagnostic.part_index)));
        }
        assert_eq!(doc.diagnostics().count(), 2);
    }
}
