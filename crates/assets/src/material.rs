use modelview_common::Color;

/// Surface parameters taken from one `newmtl` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    /// `d` in MTL terms; 1.0 is fully opaque.
    pub opacity: f32,
}

impl Material {
    fn from_tobj(m: &tobj::Material) -> Self {
        Self {
            name: m.name.clone(),
            ambient: m.ambient.map(Color::from).unwrap_or(Color::BLACK),
            diffuse: m
                .diffuse
                .map(Color::from)
                .unwrap_or(MaterialSet::DEFAULT_DIFFUSE),
            specular: m.specular.map(Color::from).unwrap_or(Color::BLACK),
            shininess: m.shininess.unwrap_or(0.0),
            opacity: m.dissolve.unwrap_or(1.0),
        }
    }
}

/// Materials parsed from an MTL library, in file order.
///
/// Geometry loaded with a set attached resolves `usemtl` names against it.
#[derive(Debug, Clone, Default)]
pub struct MaterialSet {
    materials: Vec<Material>,
    raw: Vec<tobj::Material>,
}

impl MaterialSet {
    /// Color used for faces with no (or an unknown) material.
    pub const DEFAULT_DIFFUSE: Color = Color::rgb(0.862_745, 0.945_098, 1.0);

    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tobj(raw: Vec<tobj::Material>) -> Self {
        Self {
            materials: raw.iter().map(Material::from_tobj).collect(),
            raw,
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Diffuse color for a part's material slot.
    pub fn diffuse_for(&self, index: Option<usize>) -> Color {
        index
            .and_then(|i| self.get(i))
            .map(|m| m.diffuse)
            .unwrap_or(Self::DEFAULT_DIFFUSE)
    }

    /// The set in the shape `tobj` expects back from a material loader.
    pub(crate) fn to_mtl_load_result(&self) -> tobj::MTLLoadResult {
        let mut result: tobj::MTLLoadResult = Ok(Default::default());
        if let Ok((materials, lookup)) = &mut result {
            for (index, material) in self.raw.iter().enumerate() {
                lookup.insert(material.name.clone(), index);
                materials.push(material.clone());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CUBE_MTL;

    fn parse(src: &str) -> MaterialSet {
        let (raw, _) = tobj::load_mtl_buf(&mut std::io::Cursor::new(src)).unwrap();
        MaterialSet::from_tobj(raw)
    }

    #[test]
    fn parses_named_materials_in_order() {
        let set = parse(CUBE_MTL);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().name, "red");
        assert_eq!(set.get(1).unwrap().name, "grey");
    }

    #[test]
    fn missing_fields_fall_back() {
        let set = parse(CUBE_MTL);
        let grey = set.find("grey").unwrap();
        assert_eq!(grey.specular, Color::BLACK);
        assert!((grey.opacity - 0.75).abs() < 1e-6);

        let red = set.find("red").unwrap();
        assert!((red.diffuse.r - 0.8).abs() < 1e-6);
        assert!((red.shininess - 32.0).abs() < 1e-6);
        assert_eq!(red.opacity, 1.0);
    }

    #[test]
    fn unknown_slot_uses_default_diffuse() {
        let set = parse(CUBE_MTL);
        assert_eq!(set.diffuse_for(None), MaterialSet::DEFAULT_DIFFUSE);
        assert_eq!(set.diffuse_for(Some(42)), MaterialSet::DEFAULT_DIFFUSE);
        assert_eq!(set.diffuse_for(Some(0)), set.get(0).unwrap().diffuse);
    }

    #[test]
    fn loader_result_maps_names_to_indices() {
        let set = parse(CUBE_MTL);
        let (materials, lookup) = set.to_mtl_load_result().unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(lookup.get("grey"), Some(&1));
    }
}
