mod bins;
mod collection;
