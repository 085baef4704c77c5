//! TMX document parser
//!
//! Maps `<map>` XML onto the structural model, then decodes every layer.

use crate::data::{Data, DataTile};
use crate::layer::Layer;
use crate::map::{DecodeOptions, Image, Map, Property, Tile, Tileset};
use crate::objects::{Object, ObjectGroup, PolyLine, Polygon};
use crate::{Result, TmxError};
use roxmltree::{Document, Node};
use std::fs;
use std::io::Read;
use std::path::Path;
use tmxkit_core::Gid;

/// TMX file loader
pub struct MapLoader;

impl MapLoader {
    /// Load and decode a map from a `.tmx` file
    ///
    /// External tilesets (`<tileset source="...">`) are read relative to the
    /// map's directory.
    pub fn load_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Map> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading map");

        let source = fs::read_to_string(path)?;
        let mut map = Self::parse_document(&source)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        for tileset in map.tilesets.iter_mut().filter(|t| !t.source.is_empty()) {
            let tsx_path = base_dir.join(&tileset.source);
            let external = Self::load_tileset_file(&tsx_path)?;
            *tileset = Tileset {
                first_gid: tileset.first_gid,
                source: std::mem::take(&mut tileset.source),
                ..external
            };
        }

        map.decode_layers(options)?;
        Ok(map)
    }

    /// Read and decode a map from any reader
    ///
    /// External tilesets keep only their `first_gid` and `source`.
    pub fn read<R: Read>(mut reader: R, options: &DecodeOptions) -> Result<Map> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse(std::str::from_utf8(&bytes)?, options)
    }

    /// Parse and decode a map from TMX text
    pub fn parse(source: &str, options: &DecodeOptions) -> Result<Map> {
        let mut map = Self::parse_document(source)?;
        map.decode_layers(options)?;
        Ok(map)
    }

    /// Parse the document structure without decoding layer data
    pub fn parse_document(source: &str) -> Result<Map> {
        let doc = Document::parse(source)?;
        let root = doc.root_element();
        if root.tag_name().name() != "map" {
            return Err(TmxError::InvalidDocument(format!(
                "expected <map>, found <{}>",
                root.tag_name().name()
            )));
        }
        parse_map(root)
    }

    /// Load an external tileset from a `.tsx` file
    pub fn load_tileset_file<P: AsRef<Path>>(path: P) -> Result<Tileset> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading external tileset");

        let source = fs::read_to_string(path)?;
        Self::parse_tileset(&source)
    }

    /// Parse a standalone `<tileset>` document
    pub fn parse_tileset(source: &str) -> Result<Tileset> {
        let doc = Document::parse(source)?;
        let root = doc.root_element();
        if root.tag_name().name() != "tileset" {
            return Err(TmxError::InvalidDocument(format!(
                "expected <tileset>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut tileset = Tileset::default();
        parse_tileset_body(root, &mut tileset)?;
        Ok(tileset)
    }
}

fn parse_map(map_node: Node) -> Result<Map> {
    let mut map = Map::default();

    for attribute in map_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "version" => map.version = String::from(value),
            "orientation" => map.orientation = String::from(value),
            "width" => map.width = value.parse()?,
            "height" => map.height = value.parse()?,
            "tilewidth" => map.tile_width = value.parse()?,
            "tileheight" => map.tile_height = value.parse()?,
            _ => {}
        }
    }

    for node in map_node.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "properties" => map.properties = parse_properties(node),
            "tileset" => map.tilesets.push(parse_tileset_entry(node)?),
            "layer" => map.layers.push(parse_layer(node)?),
            "objectgroup" => map.object_groups.push(parse_object_group(node)?),
            _ => {}
        }
    }

    tracing::trace!(
        width = map.width,
        height = map.height,
        tilesets = map.tilesets.len(),
        layers = map.layers.len(),
        "map structure parsed"
    );
    Ok(map)
}

fn parse_properties(properties_node: Node) -> Vec<Property> {
    properties_node
        .children()
        .filter(|node| node.has_tag_name("property"))
        .map(|node| Property {
            name: node.attribute("name").unwrap_or_default().to_string(),
            value: node
                .attribute("value")
                .map(str::to_string)
                .or_else(|| node.text().map(str::to_string))
                .unwrap_or_default(),
        })
        .collect()
}

/// A `<tileset>` inside a map, embedded or referencing a `.tsx` file
fn parse_tileset_entry(tileset_node: Node) -> Result<Tileset> {
    let first_gid: u32 = tileset_node
        .attribute("firstgid")
        .ok_or_else(|| TmxError::MissingAttribute {
            element: "tileset".into(),
            name: "firstgid".into(),
        })?
        .parse()?;

    let mut tileset = Tileset {
        first_gid,
        source: tileset_node.attribute("source").unwrap_or_default().to_string(),
        ..Default::default()
    };
    parse_tileset_body(tileset_node, &mut tileset)?;
    Ok(tileset)
}

fn parse_tileset_body(tileset_node: Node, tileset: &mut Tileset) -> Result<()> {
    for attribute in tileset_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "name" => tileset.name = String::from(value),
            "tilewidth" => tileset.tile_width = value.parse()?,
            "tileheight" => tileset.tile_height = value.parse()?,
            "spacing" => tileset.spacing = value.parse()?,
            "margin" => tileset.margin = value.parse()?,
            "tilecount" => tileset.tile_count = value.parse()?,
            "columns" => tileset.columns = value.parse()?,
            _ => {}
        }
    }

    for child in tileset_node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "properties" => tileset.properties = parse_properties(child),
            "image" => tileset.image = parse_image(child)?,
            "tile" => tileset.tiles.push(parse_tile(child)?),
            _ => {}
        }
    }
    Ok(())
}

fn parse_image(image_node: Node) -> Result<Image> {
    let mut image = Image::default();
    for attribute in image_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "source" => image.source = String::from(value),
            "trans" => image.trans = String::from(value),
            "width" => image.width = value.parse()?,
            "height" => image.height = value.parse()?,
            _ => {}
        }
    }
    Ok(image)
}

fn parse_tile(tile_node: Node) -> Result<Tile> {
    let mut tile = Tile::default();
    if let Some(id) = tile_node.attribute("id") {
        tile.id = id.parse()?;
    }
    if let Some(image_node) = tile_node.children().find(|n| n.has_tag_name("image")) {
        tile.image = parse_image(image_node)?;
    }
    Ok(tile)
}

fn parse_layer(layer_node: Node) -> Result<Layer> {
    let mut layer = Layer::default();

    for attribute in layer_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "name" => layer.name = String::from(value),
            "opacity" => layer.opacity = value.parse()?,
            "visible" => layer.visible = parse_bool("visible", value)?,
            _ => {}
        }
    }

    for child in layer_node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "properties" => layer.properties = parse_properties(child),
            "data" => layer.data = parse_data(child)?,
            _ => {}
        }
    }
    Ok(layer)
}

fn parse_data(data_node: Node) -> Result<Data> {
    let mut data = Data {
        encoding: data_node.attribute("encoding").unwrap_or_default().to_string(),
        compression: data_node.attribute("compression").unwrap_or_default().to_string(),
        ..Default::default()
    };

    // Text content, split across several nodes when interleaved with elements
    let text: String = data_node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|node| node.text())
        .collect();
    data.raw_data = text.into_bytes();

    for tile_node in data_node.children().filter(|n| n.has_tag_name("tile")) {
        let gid = match tile_node.attribute("gid") {
            Some(value) => Gid(value.parse()?),
            None => Gid::NIL,
        };
        data.tiles.push(DataTile { gid });
    }

    Ok(data)
}

fn parse_object_group(group_node: Node) -> Result<ObjectGroup> {
    let mut group = ObjectGroup::default();

    for attribute in group_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "name" => group.name = String::from(value),
            "color" => group.color = String::from(value),
            "opacity" => group.opacity = value.parse()?,
            "visible" => group.visible = parse_bool("visible", value)?,
            _ => {}
        }
    }

    for child in group_node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "properties" => group.properties = parse_properties(child),
            "object" => group.objects.push(parse_object(child)?),
            _ => {}
        }
    }
    Ok(group)
}

fn parse_object(object_node: Node) -> Result<Object> {
    let mut object = Object::default();

    for attribute in object_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "name" => object.name = String::from(value),
            "type" | "class" => object.object_type = String::from(value),
            "x" => object.x = value.parse()?,
            "y" => object.y = value.parse()?,
            "width" => object.width = value.parse()?,
            "height" => object.height = value.parse()?,
            "gid" => object.gid = Some(Gid(value.parse()?)),
            "visible" => object.visible = parse_bool("visible", value)?,
            _ => {}
        }
    }

    for child in object_node.children().filter(|n| n.is_element()) {
        let points = || child.attribute("points").unwrap_or_default().to_string();
        match child.tag_name().name() {
            "properties" => object.properties = parse_properties(child),
            "polygon" => object.polygons.push(Polygon { points: points() }),
            "polyline" => object.polylines.push(PolyLine { points: points() }),
            _ => {}
        }
    }
    Ok(object)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(TmxError::InvalidAttribute {
            name: String::from(name),
            value: String::from(value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmxkit_core::Point;

    const SIMPLE_MAP: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.2" orientation="orthogonal" width="2" height="2" tilewidth="16" tileheight="16">
 <properties>
  <property name="music" value="town.ogg"/>
 </properties>
 <tileset firstgid="1" name="ground" tilewidth="16" tileheight="16" tilecount="4" columns="2">
  <image source="ground.png" width="32" height="32"/>
  <tile id="2">
   <image source="water.png" width="16" height="16"/>
  </tile>
 </tileset>
 <tileset firstgid="5" source="props.tsx"/>
 <layer name="xml" width="2" height="2">
  <data>
   <tile gid="1"/>
   <tile gid="2"/>
   <tile/>
   <tile gid="4"/>
  </data>
 </layer>
 <layer name="csv" width="2" height="2" visible="0" opacity="0.5">
  <data encoding="csv">
0,5,
6,0
</data>
 </layer>
 <objectgroup name="things" color="#ff0000">
  <object name="spawn" type="point" x="8" y="12.5"/>
  <object name="crate" gid="1073741829" x="16" y="16" width="16" height="16"/>
  <object name="wall" x="0" y="0" visible="false">
   <polygon points="0,0 16,0 16,16"/>
  </object>
 </objectgroup>
</map>
"##;

    #[test]
    fn test_parse_map() {
        let map = MapLoader::parse(SIMPLE_MAP, &DecodeOptions::default()).unwrap();

        assert_eq!(map.version, "1.2");
        assert_eq!(map.orientation, "orthogonal");
        assert_eq!((map.width, map.height), (2, 2));
        assert_eq!((map.tile_width, map.tile_height), (16, 16));
        assert_eq!(map.properties[0].name, "music");
        assert_eq!(map.properties[0].value, "town.ogg");

        assert_eq!(map.tilesets.len(), 2);
        assert_eq!(map.tilesets[0].first_gid, 1);
        assert_eq!(map.tilesets[0].image.source, "ground.png");
        assert_eq!(map.tilesets[0].tiles[0].id, 2);
        assert_eq!(map.tilesets[0].tiles[0].image.source, "water.png");
        assert_eq!(map.tilesets[1].first_gid, 5);
        assert_eq!(map.tilesets[1].source, "props.tsx");
    }

    #[test]
    fn test_parse_layers() {
        let map = MapLoader::parse(SIMPLE_MAP, &DecodeOptions::default()).unwrap();

        let xml = map.layer("xml").unwrap();
        assert!(xml.visible);
        assert_eq!(xml.opacity, 1.0);
        assert_eq!(xml.tileset, Some(0));
        let ids: Vec<_> = xml.decoded_tiles.iter().map(|t| (t.is_nil(), t.id)).collect();
        assert_eq!(ids, vec![(false, 0), (false, 1), (true, 0), (false, 3)]);

        let csv = map.layer("csv").unwrap();
        assert!(!csv.visible);
        assert_eq!(csv.opacity, 0.5);
        assert_eq!(csv.tileset, Some(1));
        assert_eq!(csv.decoded_tiles[2].id, 1);
    }

    #[test]
    fn test_parse_objects() {
        let map = MapLoader::parse(SIMPLE_MAP, &DecodeOptions::default()).unwrap();
        let group = &map.object_groups[0];
        assert_eq!(group.name, "things");
        assert_eq!(group.color, "#ff0000");
        assert_eq!(group.objects.len(), 3);

        let spawn = &group.objects[0];
        assert_eq!(spawn.object_type, "point");
        assert_eq!(spawn.y, 12.5);
        assert!(spawn.gid.is_none());

        let crate_tile = map.decode_gid(group.objects[1].gid.unwrap()).unwrap();
        assert_eq!(crate_tile.tileset, Some(1));
        assert_eq!(crate_tile.id, 0);
        assert!(crate_tile.vertical_flip);

        let wall = &group.objects[2];
        assert!(!wall.visible);
        assert_eq!(
            wall.polygons[0].decode().unwrap(),
            vec![Point::new(0, 0), Point::new(16, 0), Point::new(16, 16)]
        );
    }

    #[test]
    fn test_not_a_map() {
        let err = MapLoader::parse("<tileset/>", &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, TmxError::InvalidDocument(_)));
    }

    #[test]
    fn test_malformed_xml() {
        let err = MapLoader::parse("<map><layer></map>", &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, TmxError::Xml(_)));
    }

    #[test]
    fn test_missing_firstgid() {
        let source = r#"<map width="1" height="1"><tileset name="x"/></map>"#;
        let err = MapLoader::parse_document(source).unwrap_err();
        assert!(matches!(err, TmxError::MissingAttribute { .. }));
    }

    #[test]
    fn test_invalid_numbers() {
        let source = r#"<map width="two" height="1"/>"#;
        assert!(matches!(MapLoader::parse_document(source), Err(TmxError::ParseInt(_))));

        let source = r#"<map width="1" height="1"><layer opacity="half"/></map>"#;
        assert!(matches!(MapLoader::parse_document(source), Err(TmxError::ParseFloat(_))));

        let source = r#"<map width="1" height="1"><layer visible="maybe"/></map>"#;
        assert!(matches!(
            MapLoader::parse_document(source),
            Err(TmxError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_parse_standalone_tileset() {
        let source = r#"<tileset name="props" tilewidth="8" tileheight="8" tilecount="16" columns="4">
 <properties><property name="solid" value="true"/></properties>
 <image source="props.png" width="32" height="32"/>
</tileset>"#;
        let tileset = MapLoader::parse_tileset(source).unwrap();
        assert_eq!(tileset.name, "props");
        assert_eq!(tileset.first_gid, 0);
        assert_eq!(tileset.columns, 4);
        assert_eq!(tileset.properties[0].value, "true");
        assert_eq!(tileset.image.width, 32);
    }

    #[test]
    fn test_read_from_reader() {
        let map = MapLoader::read(SIMPLE_MAP.as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(map.layers.len(), 2);
    }
}
