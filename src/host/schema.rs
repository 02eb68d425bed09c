//! Attribute layouts for the node types the in-memory scene knows about.

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ChildDef {
    pub(crate) long: String,
    pub(crate) short: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AttrDef {
    pub(crate) long: String,
    pub(crate) short: Option<String>,
    pub(crate) children: Vec<ChildDef>,
    pub(crate) multi: bool,
    pub(crate) default: f64,
}

impl AttrDef {
    pub(crate) fn scalar(long: &str, short: Option<&str>) -> Self {
        Self {
            long: long.to_owned(),
            short: short.map(str::to_owned),
            children: Vec::new(),
            multi: false,
            default: 0.0,
        }
    }

    /// Compound attribute whose children are the parent's long name plus a suffix
    /// (`input1` + `X` -> `input1X`).
    pub(crate) fn suffixed(long: &str, suffixes: [&str; 3]) -> Self {
        Self {
            long: long.to_owned(),
            short: None,
            children: suffixes
                .iter()
                .map(|s| ChildDef {
                    long: format!("{long}{s}"),
                    short: None,
                })
                .collect(),
            multi: false,
            default: 0.0,
        }
    }

    /// Transform-style compound with explicit short names for parent and children.
    pub(crate) fn vector(long: &str, short: &str, children: [(&str, &str); 3]) -> Self {
        Self {
            long: long.to_owned(),
            short: Some(short.to_owned()),
            children: children
                .iter()
                .map(|(l, s)| ChildDef {
                    long: (*l).to_owned(),
                    short: Some((*s).to_owned()),
                })
                .collect(),
            multi: false,
            default: 0.0,
        }
    }

    pub(crate) fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    pub(crate) fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        self.long == name || self.short.as_deref() == Some(name)
    }

    pub(crate) fn child(&self, name: &str) -> Option<&ChildDef> {
        self.children
            .iter()
            .find(|c| c.long == name || c.short.as_deref() == Some(name))
    }

    pub(crate) fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Attribute layout of one node type.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NodeSchema {
    pub(crate) attrs: Vec<AttrDef>,
}

impl NodeSchema {
    fn new(attrs: Vec<AttrDef>) -> Self {
        let mut all = vec![AttrDef::scalar("message", Some("msg"))];
        all.extend(attrs);
        Self { attrs: all }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|a| a.matches(name))
    }
}

const XYZ: [&str; 3] = ["X", "Y", "Z"];
const RGB: [&str; 3] = ["R", "G", "B"];

/// Schemas for the built-in node types, keyed by host node type.
pub(crate) fn builtin_schemas() -> HashMap<String, NodeSchema> {
    let mut m = HashMap::new();

    m.insert(
        "transform".to_owned(),
        NodeSchema::new(vec![
            AttrDef::vector(
                "translate",
                "t",
                [("translateX", "tx"), ("translateY", "ty"), ("translateZ", "tz")],
            ),
            AttrDef::vector(
                "rotate",
                "r",
                [("rotateX", "rx"), ("rotateY", "ry"), ("rotateZ", "rz")],
            ),
            AttrDef::vector(
                "scale",
                "s",
                [("scaleX", "sx"), ("scaleY", "sy"), ("scaleZ", "sz")],
            )
            .with_default(1.0),
            AttrDef::scalar("visibility", Some("v")).with_default(1.0),
        ]),
    );

    m.insert(
        "plusMinusAverage".to_owned(),
        NodeSchema::new(vec![
            AttrDef::scalar("operation", Some("op")).with_default(1.0),
            AttrDef::scalar("input1D", Some("i1")).multi(),
            AttrDef::suffixed("input3D", ["x", "y", "z"]).multi(),
            AttrDef::scalar("output1D", Some("o1")),
            AttrDef::suffixed("output3D", ["x", "y", "z"]),
        ]),
    );

    m.insert(
        "multiplyDivide".to_owned(),
        NodeSchema::new(vec![
            AttrDef::scalar("operation", Some("op")).with_default(1.0),
            AttrDef::suffixed("input1", XYZ),
            AttrDef::suffixed("input2", XYZ).with_default(1.0),
            AttrDef::suffixed("output", XYZ),
        ]),
    );

    m.insert(
        "condition".to_owned(),
        NodeSchema::new(vec![
            AttrDef::scalar("operation", Some("op")),
            AttrDef::scalar("firstTerm", Some("ft")),
            AttrDef::scalar("secondTerm", Some("st")),
            AttrDef::suffixed("colorIfTrue", RGB),
            AttrDef::suffixed("colorIfFalse", RGB),
            AttrDef::suffixed("outColor", RGB),
        ]),
    );

    m.insert(
        "blendColors".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("color1", RGB),
            AttrDef::suffixed("color2", RGB),
            AttrDef::scalar("blender", Some("b")).with_default(0.5),
            AttrDef::suffixed("output", RGB),
        ]),
    );

    m.insert(
        "clamp".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("min", RGB),
            AttrDef::suffixed("max", RGB),
            AttrDef::suffixed("input", RGB),
            AttrDef::suffixed("output", RGB),
        ]),
    );

    m.insert(
        "setRange".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("value", XYZ),
            AttrDef::suffixed("min", XYZ),
            AttrDef::suffixed("max", XYZ),
            AttrDef::suffixed("oldMin", XYZ),
            AttrDef::suffixed("oldMax", XYZ),
            AttrDef::suffixed("outValue", XYZ),
        ]),
    );

    m.insert(
        "vectorProduct".to_owned(),
        NodeSchema::new(vec![
            AttrDef::scalar("operation", Some("op")).with_default(1.0),
            AttrDef::suffixed("input1", XYZ),
            AttrDef::suffixed("input2", XYZ),
            AttrDef::scalar("normalizeOutput", Some("no")),
            AttrDef::suffixed("output", XYZ),
        ]),
    );

    m.insert(
        "distanceBetween".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("point1", XYZ),
            AttrDef::suffixed("point2", XYZ),
            AttrDef::scalar("distance", Some("d")),
        ]),
    );

    m.insert(
        "reverse".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("input", XYZ),
            AttrDef::suffixed("output", XYZ),
        ]),
    );

    m.insert(
        "angleBetween".to_owned(),
        NodeSchema::new(vec![
            AttrDef::suffixed("vector1", XYZ),
            AttrDef::suffixed("vector2", XYZ),
            AttrDef::scalar("angle", Some("a")),
        ]),
    );

    m.insert(
        "choice".to_owned(),
        NodeSchema::new(vec![
            AttrDef::scalar("selector", Some("s")),
            AttrDef::scalar("input", Some("i")).multi(),
            AttrDef::scalar("output", Some("o")),
        ]),
    );

    m.insert("container".to_owned(), NodeSchema::new(Vec::new()));

    m
}
