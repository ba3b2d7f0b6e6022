//! Presentation template module.
//!
//! Provides the parts of a minimal valid deck: one slide master with a
//! "Title Slide" and a "Blank" layout, an Office theme, and the property
//! parts PowerPoint expects. presentation.xml itself is generated, since it
//! carries the slide size.

macro_rules! resource {
    ($path:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/", $path))
    };
}

/// slideMaster1.xml, listing both layouts as rId1 and rId2.
pub fn default_slide_master_xml() -> &'static str {
    resource!("slideMasters/slideMaster1.xml")
}

/// Slide layout 1 XML (Title Slide)
pub fn slide_layout_1_xml() -> &'static str {
    resource!("slideLayouts/slideLayout1.xml")
}

/// Slide layout 2 XML (Blank)
pub fn slide_layout_2_xml() -> &'static str {
    resource!("slideLayouts/slideLayout2.xml")
}

/// All slide layout XMLs in master order.
pub fn all_slide_layouts() -> [&'static str; 2] {
    [slide_layout_1_xml(), slide_layout_2_xml()]
}

pub fn default_theme_xml() -> &'static str {
    resource!("theme/theme1.xml")
}

pub fn default_table_styles_xml() -> &'static str {
    resource!("tableStyles.xml")
}

pub fn default_view_props_xml() -> &'static str {
    resource!("viewProps.xml")
}

pub fn default_pres_props_xml() -> &'static str {
    resource!("presProps.xml")
}

/// Core properties (docProps/core.xml).
pub fn default_core_props_xml() -> &'static str {
    resource!("docProps/core.xml")
}

/// Extended properties (docProps/app.xml).
pub fn default_app_props_xml() -> &'static str {
    resource!("docProps/app.xml")
}
