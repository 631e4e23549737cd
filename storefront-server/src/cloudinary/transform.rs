//! Delivery URL and transformation builders
//!
//! A transformation is a chain of components joined with `/`, e.g.
//!
//! ```text
//! e_gen_recolor:prompt_tshirt;to-color_red/l_storefront:watermark,g_south_east,x_20,y_20/f_auto/q_auto
//! ```
//!
//! The same string is used both as an eager transformation at upload time
//! and as the transformation segment of an on-demand delivery URL.

use std::fmt;

/// Directive that marks the target color inside a recolor component
const TO_COLOR: &str = "to-color_";

/// An ordered chain of transformation components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    components: Vec<String>,
}

impl Transformation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generative recolor of `prompt` (the subject in the picture) to `color`
    pub fn gen_recolor(mut self, prompt: &str, color: &str) -> Self {
        self.components
            .push(format!("e_gen_recolor:prompt_{prompt};{TO_COLOR}{color}"));
        self
    }

    /// Overlay `<folder>/watermark` in the bottom-right corner, 20px in
    pub fn watermark(mut self, folder: &str) -> Self {
        // nested folders are addressed with ':' inside layer ids
        let layer = folder.replace('/', ":");
        self.components
            .push(format!("l_{layer}:watermark,g_south_east,x_20,y_20"));
        self
    }

    pub fn auto_format(mut self) -> Self {
        self.components.push("f_auto".into());
        self
    }

    pub fn auto_quality(mut self) -> Self {
        self.components.push("q_auto".into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

/// Builds delivery URLs and eager transformations for one cloud/folder
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    delivery_base_url: String,
    cloud_name: String,
    folder: String,
    recolor_prompt: String,
}

impl UrlBuilder {
    pub fn new(
        delivery_base_url: impl Into<String>,
        cloud_name: impl Into<String>,
        folder: impl Into<String>,
        recolor_prompt: impl Into<String>,
    ) -> Self {
        Self {
            delivery_base_url: delivery_base_url.into().trim_end_matches('/').to_string(),
            cloud_name: cloud_name.into(),
            folder: folder.into(),
            recolor_prompt: recolor_prompt.into(),
        }
    }

    /// `<base>/<cloud>/image/upload[/<transformation>]/<public_id>`
    pub fn delivery_url(&self, transformation: &Transformation, public_id: &str) -> String {
        if transformation.is_empty() {
            format!(
                "{}/{}/image/upload/{public_id}",
                self.delivery_base_url, self.cloud_name
            )
        } else {
            format!(
                "{}/{}/image/upload/{transformation}/{public_id}",
                self.delivery_base_url, self.cloud_name
            )
        }
    }

    /// The recolor + watermark + auto format/quality chain for one color
    pub fn variant_transformation(&self, color: &str) -> Transformation {
        Transformation::new()
            .gen_recolor(&self.recolor_prompt, color)
            .watermark(&self.folder)
            .auto_format()
            .auto_quality()
    }

    /// One eager transformation per color, in order
    pub fn eager_transformations(&self, colors: &[String]) -> Vec<Transformation> {
        colors
            .iter()
            .map(|c| self.variant_transformation(c))
            .collect()
    }

    /// Representative thumbnail: the original with automatic format and quality
    pub fn thumbnail_url(&self, public_id: &str) -> String {
        self.delivery_url(&Transformation::new().auto_format().auto_quality(), public_id)
    }

    /// On-demand variant URL, identical to what eager generation produces
    pub fn variant_url(&self, public_id: &str, color: &str) -> String {
        self.delivery_url(&self.variant_transformation(color), public_id)
    }
}

/// Recover the color a variant URL was generated for
pub fn color_from_variant_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(TO_COLOR)?;
    let color = rest.split(['/', ',']).next()?;
    (!color.is_empty()).then_some(color)
}
