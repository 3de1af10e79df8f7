use std::ops::{Deref, DerefMut};

/// **byte**
/// byte 标识任意一个 8 位值（8 位字节）。
///
/// **boolean**
/// 一个布尔值作为一个字节存储。0 表示 FALSE，1 表示 TRUE。
///
/// **uint32**
/// 表示一个 32 位无符号整数。按重要性降序（网络字节顺序）储存为 4 个字节。
///
/// **string**
/// 任意长度二进制字符串。字符串被储存为 1 个包含其长度（后续字节数量）的 uint32
/// 以及 0（=空字符串）或作为字符串的值的更多的字节。不使用终结符（空字符）。
///
/// **mpint**
/// 表示二进制补码（two's complement）格式的多精度整数，存储为一个字符串，每字节
/// 8 位，从高位到低位（MSB first）。对于正数，如果最高位将被置为 1，则必须在前面
/// 加一个值为 0 的字节。禁止包含值为 0 或 255 的非必要的前导字节（leading bytes）。
/// 零必须被存储为具有 0 个字节的数据的字符串。
///
/// **name-list**
/// 一个包含逗号分隔的名称列表的字符串。名称列表表示为一个含有其长度（后续字节数量）
/// 的 uint32，加上一个包含 0 或多个逗号分隔的名称的列表。
#[derive(Debug, Clone, Default)]
pub struct Data(Vec<u8>);

impl Data {
    pub fn new() -> Data {
        Data(Vec::new())
    }

    // 无符号字节 8位
    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.0.push(v);
        self
    }

    // 32位无符号整型
    pub fn put_u32(&mut self, v: u32) -> &mut Self {
        let vec = v.to_be_bytes().to_vec();
        self.0.extend(&vec);
        self
    }

    // 字符串型数据
    // 需要计算字符串长度
    pub fn put_str(&mut self, str: &str) -> &mut Self {
        let v = str.as_bytes();
        self.put_u32(v.len() as u32);
        self.0.extend(v);
        self
    }

    // 字节数组
    // 需要计算数组长度
    pub fn put_u8s(&mut self, v: &[u8]) -> &mut Self {
        self.put_u32(v.len() as u32);
        self.0.extend(v);
        self
    }

    // 多精度整数
    // 去掉非必要的前导零；首字节最高位为 1 时补一个值为 0 的字节
    pub fn put_mpint(&mut self, v: &[u8]) -> &mut Self {
        let mut result: Vec<u8> = Vec::new();
        let trimmed: &[u8] = {
            let mut i = 0;
            while i < v.len() && v[i] == 0 {
                i += 1;
            }
            &v[i..]
        };
        // 0x80 = 128
        if !trimmed.is_empty() && trimmed[0] & 0x80 != 0 {
            result.push(0);
        }
        result.extend(trimmed);
        self.put_u8s(&result)
    }

    // 跳过多少位数据
    pub fn skip(&mut self, size: usize) {
        self.0.drain(..size);
    }

    // 获取字节
    pub fn get_u8(&mut self) -> u8 {
        self.0.remove(0)
    }

    // 获取32位无符号整型
    pub fn get_u32(&mut self) -> u32 {
        let u32_buf = self.0.drain(..4).collect::<Vec<u8>>();
        u32::from_be_bytes(u32_buf.try_into().unwrap())
    }

    // 获取字节数组
    pub fn get_u8s(&mut self) -> Vec<u8> {
        let len = self.get_u32() as usize;
        let bytes = self.0.drain(..len).collect::<Vec<u8>>();
        bytes
    }

    // 获取多精度整数的原始字节，可能带前导符号字节
    pub fn get_mpint(&mut self) -> Vec<u8> {
        self.get_u8s()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Data {
    fn from(v: Vec<u8>) -> Self {
        Data(v)
    }
}

impl From<&[u8]> for Data {
    fn from(v: &[u8]) -> Self {
        Data(v.into())
    }
}

impl From<Data> for Vec<u8> {
    fn from(data: Data) -> Self {
        data.0
    }
}

impl Deref for Data {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Data {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Data;

    #[test]
    fn put_get_roundtrip() {
        let mut data = Data::new();
        data.put_u8(20).put_u32(42).put_str("testing").put_u8s(&[1, 2, 3]);
        assert_eq!(data.get_u8(), 20);
        assert_eq!(data.get_u32(), 42);
        assert_eq!(data.get_u8s(), b"testing".to_vec());
        assert_eq!(data.get_u8s(), vec![1, 2, 3]);
        assert!(data.is_empty());
    }

    #[test]
    fn mpint_sign_guard() {
        let mut data = Data::new();
        data.put_mpint(&[0x80, 0x01]);
        assert_eq!(data.to_vec(), vec![0, 0, 0, 3, 0x00, 0x80, 0x01]);
    }

    #[test]
    fn mpint_no_guard_needed() {
        let mut data = Data::new();
        data.put_mpint(&[0x12, 0x34]);
        assert_eq!(data.to_vec(), vec![0, 0, 0, 2, 0x12, 0x34]);
    }

    #[test]
    fn mpint_trims_leading_zeros() {
        let mut data = Data::new();
        data.put_mpint(&[0x00, 0x00, 0x7f]);
        assert_eq!(data.to_vec(), vec![0, 0, 0, 1, 0x7f]);
    }

    #[test]
    fn mpint_zero_is_empty() {
        let mut data = Data::new();
        data.put_mpint(&[0x00, 0x00]);
        assert_eq!(data.to_vec(), vec![0, 0, 0, 0]);
    }
}
