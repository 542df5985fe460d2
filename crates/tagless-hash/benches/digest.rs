use std::io::Cursor;

use tagless_hash::{hash_music, hash_range, syncsafe, Blake3Hasher, DigestHasher};

fn make_song(size: usize) -> Vec<u8> {
    // 4 KiB id3v2.3 tag, semi-realistic payload, id3v1 tag
    let mut data = b"ID3\x03\x00\x00".to_vec();
    data.extend(syncsafe::encode(4096 - 10));
    data.resize(4096, 0);
    data.extend((0..size).map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8));
    data.extend(b"TAG");
    data.resize(data.len() + 125, b' ');
    data
}

#[divan::bench(args = [65536, 1048576, 10485760])]
fn sha1_music(bencher: divan::Bencher, size: usize) {
    let data = make_song(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            let mut src = Cursor::new(divan::black_box(&data));
            hash_music(&mut src, DigestHasher::<sha1::Sha1>::new()).unwrap()
        });
}

#[divan::bench(args = [65536, 1048576, 10485760])]
fn blake3_music(bencher: divan::Bencher, size: usize) {
    let data = make_song(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            let mut src = Cursor::new(divan::black_box(&data));
            hash_music(&mut src, Blake3Hasher::new()).unwrap()
        });
}

#[divan::bench(args = [4096, 65536, 524288])]
fn chunk_size(bencher: divan::Bencher, chunk: usize) {
    let data = make_song(10485760);
    let end = data.len() as u64 - 128;
    bencher
        .counter(divan::counter::BytesCount::new(data.len()))
        .bench(|| {
            let mut src = Cursor::new(divan::black_box(&data));
            hash_range(&mut src, 4096, end, Blake3Hasher::new(), chunk).unwrap()
        });
}

fn main() {
    divan::main();
}
