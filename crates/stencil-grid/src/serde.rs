use crate::{Grid, Region};

use serde::ser::SerializeStruct;
use serde::Deserialize;

impl<T, const N: usize> serde::Serialize for Grid<T, N>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Grid", 2)?;
        state.serialize_field("data", self.as_slice())?;
        state.serialize_field("shape", &self.shape().to_vec())?;
        state.end()
    }
}

impl<'de, T, const N: usize> serde::Deserialize<'de> for Grid<T, N>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GridData<T> {
            data: Vec<T>,
            shape: Vec<usize>,
        }

        let GridData { data, shape } = GridData::deserialize(deserializer)?;

        let shape: [usize; N] = shape
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid shape"))?;

        Grid::from_shape_vec(shape, data).map_err(serde::de::Error::custom)
    }
}

impl<const N: usize> serde::Serialize for Region<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Region", 2)?;
        state.serialize_field("index", &self.index.to_vec())?;
        state.serialize_field("size", &self.size.to_vec())?;
        state.end()
    }
}

impl<'de, const N: usize> serde::Deserialize<'de> for Region<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RegionData {
            index: Vec<isize>,
            size: Vec<usize>,
        }

        let RegionData { index, size } = RegionData::deserialize(deserializer)?;

        let index: [isize; N] = index
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid region index"))?;
        let size: [usize; N] = size
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid region size"))?;

        Ok(Region::new(index, size))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Grid, Region};

    #[test]
    fn test_serde_grid() -> Result<(), Box<dyn std::error::Error>> {
        let grid = Grid::<u8, 2>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6])?;
        let serialized = serde_json::to_string(&grid)?;
        let deserialized: Grid<u8, 2> = serde_json::from_str(&serialized)?;
        assert_eq!(grid, deserialized);
        Ok(())
    }

    #[test]
    fn test_serde_grid_bad_shape() {
        let res = serde_json::from_str::<Grid<u8, 2>>(r#"{"data":[1,2,3],"shape":[2,2]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_serde_region() -> Result<(), Box<dyn std::error::Error>> {
        let region = Region::new([-1, 2, 0], [3, 4, 5]);
        let serialized = serde_json::to_string(&region)?;
        let deserialized: Region<3> = serde_json::from_str(&serialized)?;
        assert_eq!(region, deserialized);
        Ok(())
    }
}
