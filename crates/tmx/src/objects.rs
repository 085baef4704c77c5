//! Object groups and their shapes

use crate::map::Property;
use crate::{Result, TmxError};
use serde::Serialize;
use tmxkit_core::{Gid, Point};

/// An `<objectgroup>` element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectGroup {
    pub name: String,
    pub color: String,
    pub opacity: f32,
    pub visible: bool,
    pub properties: Vec<Property>,
    pub objects: Vec<Object>,
}

impl Default for ObjectGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: String::new(),
            opacity: 1.0,
            visible: true,
            properties: Vec::new(),
            objects: Vec::new(),
        }
    }
}

/// An `<object>` element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub name: String,
    pub object_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Raw GID of a tile object, flip bits included.
    /// Resolve it with [`crate::Map::decode_gid`].
    pub gid: Option<Gid>,

    pub visible: bool,
    pub polygons: Vec<Polygon>,
    pub polylines: Vec<PolyLine>,
    pub properties: Vec<Property>,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            name: String::new(),
            object_type: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            gid: None,
            visible: true,
            polygons: Vec::new(),
            polylines: Vec::new(),
            properties: Vec::new(),
        }
    }
}

/// A closed shape, points stored as written (`"x1,y1 x2,y2 ..."`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Polygon {
    pub points: String,
}

/// An open shape, same point syntax as [`Polygon`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolyLine {
    pub points: String,
}

impl Polygon {
    pub fn decode(&self) -> Result<Vec<Point>> {
        decode_points(&self.points)
    }
}

impl PolyLine {
    pub fn decode(&self) -> Result<Vec<Point>> {
        decode_points(&self.points)
    }
}

/// Parse space separated `x,y` integer pairs
pub fn decode_points(points: &str) -> Result<Vec<Point>> {
    points
        .split(' ')
        .map(|pair| -> Result<Point> {
            let coords: Vec<&str> = pair.split(',').collect();
            if coords.len() != 2 {
                return Err(TmxError::InvalidPointsField);
            }

            let x: i32 = coords[0].parse()?;
            let y: i32 = coords[1].parse()?;
            Ok(Point { x, y })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_polygon() {
        let polygon = Polygon {
            points: "0,0 32,0 32,-16 0,16".into(),
        };
        let points = polygon.decode().unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(0, 0),
                Point::new(32, 0),
                Point::new(32, -16),
                Point::new(0, 16),
            ]
        );
    }

    #[test]
    fn test_decode_polyline() {
        let line = PolyLine {
            points: "1,2".into(),
        };
        assert_eq!(line.decode().unwrap(), vec![Point::new(1, 2)]);
    }

    #[test]
    fn test_invalid_pairs() {
        assert!(matches!(decode_points("0,0 1"), Err(TmxError::InvalidPointsField)));
        assert!(matches!(decode_points("0,0,0"), Err(TmxError::InvalidPointsField)));
        assert!(matches!(decode_points(""), Err(TmxError::InvalidPointsField)));
    }

    #[test]
    fn test_non_integer_coordinates() {
        assert!(matches!(decode_points("0,0 1.5,2"), Err(TmxError::ParseInt(_))));
    }
}
